use tft_state::Unit;

/// Strength contribution of one unit: cost dominates, stars grow
/// quadratically, items add linearly.
pub fn unit_strength(unit: &Unit) -> u32 {
    let items = u32::try_from(unit.items.len()).unwrap_or(u32::MAX);
    unit.cost
        .saturating_mul(10)
        .saturating_add(unit.stars.saturating_pow(2).saturating_mul(5))
        .saturating_add(items.saturating_mul(3))
}

pub fn board_strength(board: &[Unit]) -> u32 {
    board
        .iter()
        .map(unit_strength)
        .fold(0u32, u32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unit_strength_example() {
        let unit = Unit::new("Ahri", 4, 3).with_items(["A", "B"]);
        assert_eq!(unit_strength(&unit), 91);
    }

    #[test]
    fn test_board_strength_sums_units() {
        let board = vec![
            Unit::new("Garen", 1, 1),
            Unit::new("Ahri", 4, 1).with_items(["Blue Buff"]),
        ];
        assert_eq!(board_strength(&board), 15 + 48);
        assert_eq!(board_strength(&[]), 0);
    }

    #[test]
    fn test_star_jumps_are_uneven() {
        let one = unit_strength(&Unit::new("x", 2, 1));
        let two = unit_strength(&Unit::new("x", 2, 2));
        let three = unit_strength(&Unit::new("x", 2, 3));
        assert!(three - two > two - one);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let unit = Unit::new("x", u32::MAX, u32::MAX);
        assert_eq!(unit_strength(&unit), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_adding_item_never_decreases_strength(
            cost in 1u32..=5,
            stars in 1u32..=3,
            items in 0usize..3,
        ) {
            let unit = Unit::new("x", cost, stars).with_items(vec!["item"; items]);
            let mut upgraded = unit.clone();
            upgraded.items.push("another".to_string());
            prop_assert!(unit_strength(&upgraded) >= unit_strength(&unit));
        }
    }
}
