/// Previous index in a cyclic list of `len` items.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 || index > len {
        len - 1
    } else {
        index - 1
    }
}

/// Next index in a cyclic list of `len` items.
pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}
