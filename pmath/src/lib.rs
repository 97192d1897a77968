pub mod bbox;
pub mod numbers;
pub mod ray;
pub mod sampling;
pub mod vector;

/// `PartialOrd` version of `std::cmp::min`. If the values can't be compared, `b` is returned.
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// `PartialOrd` version of `std::cmp::max`. If the values can't be compared, `b` is returned.
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}
