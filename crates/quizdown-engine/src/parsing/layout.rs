//! Horizontal width allocation for the blocks of a section.
//!
//! Explicit positive widths are honoured as given. Every other block gets an
//! equal floor share of whatever is left of 100. The rounding remainder is
//! not redistributed, so a row may add up to slightly less than 100, and
//! explicit widths are never scaled, so it may also exceed it.

/// Total width shared by the blocks of one section.
pub const FULL_WIDTH: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocated<T> {
    pub item: T,
    pub width: i32,
}

/// Allocate widths to `items`. `explicit_width` returns the author's width
/// for an item; anything not positive counts as unassigned.
pub fn allocate<T>(
    items: impl IntoIterator<Item = T>,
    explicit_width: impl Fn(&T) -> i32,
) -> Vec<Allocated<T>> {
    // Explicit widths are unbounded, so their total can leave i32
    let mut remaining = i64::from(FULL_WIDTH);

    // First pass: take explicit widths out of the total
    let mut allocated: Vec<(Allocated<T>, bool)> = items
        .into_iter()
        .map(|item| {
            let width = explicit_width(&item);
            let explicit = width > 0;
            if explicit {
                remaining -= i64::from(width);
            }
            (Allocated { item, width }, explicit)
        })
        .collect();

    // Second pass: share what is left between the rest
    let unassigned = allocated.iter().filter(|(_, explicit)| !explicit).count() as i64;
    if unassigned > 0 {
        let share = remaining
            .div_euclid(unassigned)
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        for (slot, explicit) in &mut allocated {
            if !*explicit {
                slot.width = share;
            }
        }
    }

    allocated.into_iter().map(|(slot, _)| slot).collect()
}

/// Read a width attribute the way HTML `parseInt` does: optional leading
/// whitespace and sign, then as many digits as are present. Anything
/// unparseable is 0.
pub fn parse_width(value: &str) -> i32 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end]
        .parse::<i64>()
        .map(|n| n.min(i32::MAX as i64) as i32)
        .unwrap_or(0);
    if negative { -magnitude } else { magnitude }
}
