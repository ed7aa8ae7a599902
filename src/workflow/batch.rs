/// 默认每批元素数量
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// 按固定大小切分为连续、不重叠的批次，最后一批可能较短
///
/// 不重排、不复制、不丢弃；`size` 为 0 时按 1 处理
pub fn partition<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_and_sizes() {
        for n in 0..=23usize {
            let items: Vec<usize> = (0..n).collect();
            let batches = partition(&items, DEFAULT_BATCH_SIZE);

            assert_eq!(batches.len(), n.div_ceil(DEFAULT_BATCH_SIZE), "n = {}", n);
            let full = n / DEFAULT_BATCH_SIZE;
            assert!(batches[..full].iter().all(|b| b.len() == DEFAULT_BATCH_SIZE));

            let rebuilt: Vec<usize> = batches.concat();
            assert_eq!(rebuilt, items);
        }
    }

    #[test]
    fn seven_records_split_five_and_two() {
        let items = ["a", "b", "c", "d", "e", "f", "g"];
        let batches = partition(&items, 5);
        assert_eq!(batches, vec![&items[..5], &items[5..]]);
    }

    #[test]
    fn zero_size_is_treated_as_one() {
        let items = [1, 2, 3];
        assert_eq!(partition(&items, 0).len(), 3);
    }
}
