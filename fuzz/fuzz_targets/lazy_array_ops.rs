#![no_main]
use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;

use lazybits::lazy_array::LazyArray;
use lazybits::packed::PackedLazyArray;

fuzz_target!(|data: (u16, Vec<(u32, u16)>)| {
    let (len_raw, ops) = data;
    let len = len_raw as usize % 4096;
    if len == 0 {
        return;
    }

    let mut arr = LazyArray::new(len, u16::MAX).unwrap();
    let mut packed = PackedLazyArray::new(len, u16::MAX).unwrap();
    let mut model: HashMap<usize, u16> = HashMap::new();

    for (raw_idx, value) in ops {
        let i = raw_idx as usize % len;
        *arr.get_mut(i).unwrap() = value;
        *packed.get_mut(i).unwrap() = value;
        model.insert(i, value);
    }

    for i in 0..len {
        let expected = model.get(&i).copied().unwrap_or(u16::MAX);
        assert_eq!(arr.get(i).unwrap(), expected);
        assert_eq!(packed.get(i).unwrap(), expected);
    }

    assert_eq!(arr.written(), model.len());
    assert!(arr.get(len).is_err());
    assert!(packed.get(len).is_err());
});
