//! Text the storefront shows next to the cart icon.

pub const EMPTY_CART_TEXT: &str = "Корзина пуста";

/// Russian plural of "item" for `count`.
pub fn item_word(count: u64) -> &'static str {
    let last_digit = count % 10;
    let last_two_digits = count % 100;

    if (11..=14).contains(&last_two_digits) {
        return "товаров";
    }
    match last_digit {
        1 => "товар",
        2..=4 => "товара",
        _ => "товаров",
    }
}

/// Groups thousands with a no-break space and appends the ruble sign,
/// e.g. `12 500 ₽`.
pub fn format_rub(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2 + 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(c);
    }
    grouped.push_str(" ₽");
    grouped
}

pub fn tooltip_text(total_quantity: u64, total_price: u64) -> String {
    if total_quantity == 0 {
        return EMPTY_CART_TEXT.to_string();
    }
    format!(
        "{} {}, {}",
        total_quantity,
        item_word(total_quantity),
        format_rub(total_price)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_forms() {
        assert_eq!(item_word(1), "товар");
        assert_eq!(item_word(21), "товар");
        assert_eq!(item_word(3), "товара");
        assert_eq!(item_word(104), "товара");
        assert_eq!(item_word(0), "товаров");
        assert_eq!(item_word(5), "товаров");
        assert_eq!(item_word(11), "товаров");
        assert_eq!(item_word(112), "товаров");
    }

    #[test]
    fn ruble_grouping() {
        assert_eq!(format_rub(0), "0 ₽");
        assert_eq!(format_rub(999), "999 ₽");
        assert_eq!(format_rub(1000), "1\u{a0}000 ₽");
        assert_eq!(format_rub(1_234_567), "1\u{a0}234\u{a0}567 ₽");
    }

    #[test]
    fn tooltip_for_empty_and_filled_cart() {
        assert_eq!(tooltip_text(0, 0), EMPTY_CART_TEXT);
        assert_eq!(tooltip_text(2, 2000), "2 товара, 2\u{a0}000 ₽");
    }
}
