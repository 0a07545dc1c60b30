/// Преобразует строку в slug: строчные ASCII-буквы и цифры, остальное
/// схлопывается в один `-`, дефисы по краям удаляются.
///
/// ```ignore
/// assert_eq!(slugify("Red Mug-SKU-1"), "red-mug-sku-1");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
        // прочие символы (пунктуация, не-ASCII) отбрасываются без разделителя
    }

    slug
}

/// Округление денежной суммы до копеек
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Red Mug-SKU-123456-AB12CD"), "red-mug-sku-123456-ab12cd");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Mugs & Cups"), "mugs-cups");
        assert_eq!(slugify("don't"), "dont");
        assert_eq!(slugify("Кружка 42"), "42");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(80.0), 80.0);
        assert_eq!(round2(19.999), 20.0);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(0.125), 0.13);
    }
}
