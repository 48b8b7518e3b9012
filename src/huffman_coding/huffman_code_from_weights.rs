//! This helper function is part of the huffman encoding system.
//!
//! It turns a table of symbol weights into minimum-redundancy code lengths, in place,
//! using the Moffat-Katajainen method. The weights must already be sorted in ascending
//! order and contain no zeros. No tree is built; the slice itself holds the parent
//! pointers, then the internal node depths and finally the leaf depths.
//!
//! Code lengths are not capped. With 32 bit weights they stay well below 64 bits.
//!

/// Replace each ascending, nonzero weight with the length of its code. Lengths come out
/// non-increasing, so the lightest symbol gets the longest code.
pub fn improve_code_len_from_weights(a: &mut [u32]) {
    let n = a.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        a[0] = 0;
        return;
    }

    // Pass 1: combine the two lightest items (leaf or internal node) into the next
    // internal node, leaving parent pointers behind in the slots already used.
    a[0] += a[1];
    let mut root = 0_usize;
    let mut leaf = 2_usize;
    for next in 1..n - 1 {
        // First child
        if leaf >= n || a[root] < a[leaf] {
            a[next] = a[root];
            a[root] = next as u32;
            root += 1;
        } else {
            a[next] = a[leaf];
            leaf += 1;
        }
        // Second child
        if leaf >= n || (root < next && a[root] < a[leaf]) {
            a[next] += a[root];
            a[root] = next as u32;
            root += 1;
        } else {
            a[next] += a[leaf];
            leaf += 1;
        }
    }

    // Pass 2: turn parent pointers into internal node depths, root first
    a[n - 2] = 0;
    for next in (0..n - 2).rev() {
        a[next] = a[a[next] as usize] + 1;
    }

    // Pass 3: turn internal node depths into leaf depths
    let mut avbl = 1_u32;
    let mut used = 0_u32;
    let mut dpth = 0_u32;
    let mut root = n as isize - 2;
    let mut next = n as isize - 1;
    while avbl > 0 {
        while root >= 0 && a[root as usize] == dpth {
            used += 1;
            root -= 1;
        }
        while avbl > used {
            a[next as usize] = dpth;
            next -= 1;
            avbl -= 1;
        }
        avbl = 2 * used;
        dpth += 1;
        used = 0;
    }
}

#[cfg(test)]
mod test {
    use super::improve_code_len_from_weights;

    #[test]
    fn small_sets_test() {
        let mut a: [u32; 0] = [];
        improve_code_len_from_weights(&mut a);

        let mut a = [5];
        improve_code_len_from_weights(&mut a);
        assert_eq!(a, [0]);

        let mut a = [3, 9];
        improve_code_len_from_weights(&mut a);
        assert_eq!(a, [1, 1]);

        let mut a = [1, 1, 2, 4];
        improve_code_len_from_weights(&mut a);
        assert_eq!(a, [3, 3, 2, 1]);
    }

    #[test]
    fn balanced_test() {
        let mut a = [10; 8];
        improve_code_len_from_weights(&mut a);
        assert_eq!(a, [3; 8]);
    }

    #[test]
    fn fibonacci_test() {
        // Fibonacci weights give the deepest possible tree
        let mut a = [1, 1, 2, 3, 5, 8, 13, 21];
        improve_code_len_from_weights(&mut a);
        assert_eq!(a, [7, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn kraft_test() {
        let mut a: Vec<u32> = (1..=200).map(|x| x * x % 97 + 1).collect();
        a.sort_unstable();
        improve_code_len_from_weights(&mut a);
        let max = *a.iter().max().unwrap();
        let sum: u128 = a.iter().map(|&l| 1_u128 << (max - l)).sum();
        assert_eq!(sum, 1_u128 << max);
        assert!(a.windows(2).all(|w| w[0] >= w[1]));
    }
}
