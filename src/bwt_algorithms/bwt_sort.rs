use log::trace;

use crate::error::{try_with_capacity, Result};

/// Partitions this small are finished with a shell sort.
const SMALL_SORT: usize = 16;
/// Gaps used by the shell sort. Small partitions only, so a short sequence does.
const GAPS: [usize; 3] = [7, 3, 1];

/// A range of the rotation table still to be sorted, and the byte depth at which every
/// rotation in it is already known to be equal.
struct Partition {
    lo: usize,
    hi: usize,
    depth: usize,
}

/// Median of three bytes.
#[inline(always)]
fn median(a: u8, b: u8, c: u8) -> u8 {
    a.max(b).min(a.min(b).max(c))
}

/// Finish a small partition with a shell sort, comparing rotations from `depth` up to
/// their full length `n`.
fn shell_sort(rotations: &mut [u32], barrel: &[u8], depth: usize, n: usize) {
    let rotation = |r: u32| &barrel[r as usize + depth..r as usize + n];
    let len = rotations.len();
    for &gap in GAPS.iter().filter(|&&g| g < len) {
        for i in gap..len {
            let r = rotations[i];
            let mut j = i;
            while j >= gap && rotation(rotations[j - gap]) > rotation(r) {
                rotations[j] = rotations[j - gap];
                j -= gap;
            }
            rotations[j] = r;
        }
    }
}

/// Sort rotation offsets into `barrel` (the block written out twice) by the first `n`
/// bytes of each rotation, using a multikey quicksort. Work is kept on a heap stack
/// rather than the call stack, so highly repetitive blocks can not overflow it.
pub fn sort_rotations(barrel: &[u8], rotations: &mut [u32], n: usize) -> Result<()> {
    let mut stack: Vec<Partition> = try_with_capacity(64)?;
    stack.push(Partition {
        lo: 0,
        hi: rotations.len(),
        depth: 0,
    });
    let mut passes = 0_usize;

    while let Some(Partition { lo, hi, depth }) = stack.pop() {
        let len = hi - lo;
        if len < 2 || depth >= n {
            continue;
        }
        if len <= SMALL_SORT {
            shell_sort(&mut rotations[lo..hi], barrel, depth, n);
            continue;
        }
        passes += 1;

        let key = |r: u32| barrel[r as usize + depth];
        let pivot = median(
            key(rotations[lo]),
            key(rotations[lo + len / 2]),
            key(rotations[hi - 1]),
        );

        // Three way partition: [lo, lt) < pivot, [lt, gt) == pivot, [gt, hi) > pivot
        let (mut lt, mut i, mut gt) = (lo, lo, hi);
        while i < gt {
            let k = key(rotations[i]);
            if k < pivot {
                rotations.swap(lt, i);
                lt += 1;
                i += 1;
            } else if k > pivot {
                gt -= 1;
                rotations.swap(i, gt);
            } else {
                i += 1;
            }
        }

        stack.push(Partition { lo, hi: lt, depth });
        stack.push(Partition {
            lo: gt,
            hi,
            depth,
        });
        if depth + 1 < n {
            stack.push(Partition {
                lo: lt,
                hi: gt,
                depth: depth + 1,
            });
        }
    }
    trace!("Rotation sort took {} partition passes", passes);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{median, shell_sort, sort_rotations};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn check_sorted(data: &[u8]) {
        let n = data.len();
        let barrel = [data, data].concat();
        let mut rotations: Vec<u32> = (0..n as u32).collect();
        sort_rotations(&barrel, &mut rotations, n).unwrap();
        for w in rotations.windows(2) {
            let a = &barrel[w[0] as usize..w[0] as usize + n];
            let b = &barrel[w[1] as usize..w[1] as usize + n];
            assert!(a <= b);
        }
        let mut seen = rotations.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..n as u32).collect::<Vec<u32>>());
    }

    #[test]
    fn median_test() {
        assert_eq!(median(1, 2, 3), 2);
        assert_eq!(median(3, 1, 2), 2);
        assert_eq!(median(2, 3, 1), 2);
        assert_eq!(median(5, 5, 1), 5);
    }

    #[test]
    fn small_sort_test() {
        check_sorted(b"banana");
        check_sorted(b"a");
        check_sorted(b"zyxwvutsrqponmlkjihgfedcba");
    }

    #[test]
    fn shell_sort_test() {
        let data = b"cbacabcbbcaa";
        let n = data.len();
        let barrel = [&data[..], &data[..]].concat();
        let mut rotations: Vec<u32> = (0..n as u32).rev().collect();
        shell_sort(&mut rotations, &barrel, 0, n);
        let mut expected: Vec<u32> = (0..n as u32).collect();
        expected.sort_by(|&a, &b| barrel[a as usize..a as usize + n].cmp(&barrel[b as usize..b as usize + n]));
        assert_eq!(rotations, expected);

        // The rotations starting with 'c', compared from depth 1
        let mut rotations = vec![0_u32, 3, 6, 9];
        shell_sort(&mut rotations, &barrel, 1, n);
        assert_eq!(rotations, vec![9, 3, 0, 6]);
    }

    #[test]
    fn repetitive_sort_test() {
        check_sorted(&[0_u8; 3000]);
        check_sorted(&b"abc".repeat(700));
    }

    #[test]
    fn random_sort_test() {
        let mut rng = StdRng::seed_from_u64(3);
        let data: Vec<u8> = (0..10_000).map(|_| rng.gen_range(b'a'..=b'e')).collect();
        check_sorted(&data);
    }
}
