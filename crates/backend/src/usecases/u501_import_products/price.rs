use crate::shared::text::round2;
use contracts::domain::a003_product::price::{DiscountType, PriceBreakdown};

/// Числовые цены из строки файла; 0 означает "не задано"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceInput {
    pub base: f64,
    pub list: f64,
    pub final_price: f64,
    pub legacy_base: f64,
    pub legacy_sale: f64,
    pub discount_type: Option<DiscountType>,
    pub discount_value: f64,
}

impl PriceInput {
    /// Исходные поля уже посчитанной разбивки (для пересчета после правки оператором)
    pub fn from_breakdown(price: &PriceBreakdown) -> Self {
        Self {
            base: price.base,
            list: price.list,
            final_price: price.final_price,
            discount_type: price.discount_type,
            discount_value: price.discount_value,
            ..Default::default()
        }
    }
}

fn first_present(values: &[f64]) -> f64 {
    values.iter().copied().find(|v| *v != 0.0).unwrap_or(0.0)
}

/// Разбивка цены: base и list по цепочкам подстановки, final из list и скидки.
pub fn derive_price(input: &PriceInput) -> PriceBreakdown {
    let base = first_present(&[input.base, input.legacy_base, input.list, input.legacy_sale]);
    let list = first_present(&[input.list, input.legacy_base, input.base]);

    let (final_price, discount_type, discount_value) =
        match (input.discount_type, input.discount_value) {
            (Some(DiscountType::Percent), value) if value > 0.0 => {
                let value = value.min(100.0);
                (list * (1.0 - value / 100.0), Some(DiscountType::Percent), value)
            }
            (Some(DiscountType::Amount), value) if value > 0.0 => {
                let value = value.min(list.max(0.0));
                (list - value, Some(DiscountType::Amount), value)
            }
            _ if input.final_price > 0.0 && input.final_price < list => (
                input.final_price,
                Some(DiscountType::Amount),
                list - input.final_price,
            ),
            _ => (list, None, 0.0),
        };

    PriceBreakdown {
        base: round2(base),
        list: round2(list),
        final_price: round2(final_price.max(0.0)),
        discount_type,
        discount_value: round2(discount_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_discount() {
        let price = derive_price(&PriceInput {
            list: 100.0,
            discount_type: Some(DiscountType::Percent),
            discount_value: 20.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 80.0);
        assert_eq!(price.discount_type, Some(DiscountType::Percent));
        assert_eq!(price.base, 100.0);
    }

    #[test]
    fn test_amount_discount_never_negative() {
        let price = derive_price(&PriceInput {
            list: 10.0,
            discount_type: Some(DiscountType::Amount),
            discount_value: 15.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 0.0);
        assert_eq!(price.discount_value, 10.0);
    }

    #[test]
    fn test_percent_discount_capped_at_full_price() {
        let price = derive_price(&PriceInput {
            list: 40.0,
            discount_type: Some(DiscountType::Percent),
            discount_value: 150.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 0.0);
        assert_eq!(price.discount_value, 100.0);
    }

    #[test]
    fn test_derive_is_stable_on_own_output() {
        let first = derive_price(&PriceInput {
            list: 100.0,
            final_price: 75.0,
            ..Default::default()
        });
        let again = derive_price(&PriceInput::from_breakdown(&first));
        assert_eq!(again, first);
    }

    #[test]
    fn test_implied_amount_from_final() {
        let price = derive_price(&PriceInput {
            list: 100.0,
            final_price: 80.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 80.0);
        assert_eq!(price.discount_type, Some(DiscountType::Amount));
        assert_eq!(price.discount_value, 20.0);
    }

    #[test]
    fn test_final_above_list_ignored() {
        let price = derive_price(&PriceInput {
            list: 100.0,
            final_price: 120.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 100.0);
        assert_eq!(price.discount_type, None);
    }

    #[test]
    fn test_legacy_fallbacks() {
        let price = derive_price(&PriceInput {
            legacy_base: 50.0,
            legacy_sale: 40.0,
            ..Default::default()
        });
        assert_eq!(price.base, 50.0);
        assert_eq!(price.list, 50.0);
        assert_eq!(price.final_price, 50.0);

        let price = derive_price(&PriceInput {
            legacy_sale: 40.0,
            ..Default::default()
        });
        assert_eq!(price.base, 40.0);
        assert_eq!(price.list, 0.0);
    }

    #[test]
    fn test_rounding() {
        let price = derive_price(&PriceInput {
            list: 99.99,
            discount_type: Some(DiscountType::Percent),
            discount_value: 33.0,
            ..Default::default()
        });
        assert_eq!(price.final_price, 66.99);
    }
}
