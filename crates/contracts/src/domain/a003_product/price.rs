use serde::{Deserialize, Serialize};

/// Тип скидки товара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Процент от list
    Percent,
    /// Фиксированная сумма
    Amount,
}

impl DiscountType {
    /// Разбор значения из ячейки таблицы (без учета регистра)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "percent" | "percentage" | "%" => Some(Self::Percent),
            "amount" | "fixed" | "flat" => Some(Self::Amount),
            _ => None,
        }
    }
}

/// Разбивка цены: base (закупочная/базовая), list (цена до скидки), final (цена продажи).
/// Инвариант: final вычисляется из list и полей скидки; без скидки final == list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base: f64,
    pub list: f64,
    #[serde(rename = "final")]
    pub final_price: f64,
    #[serde(rename = "discountType")]
    pub discount_type: Option<DiscountType>,
    #[serde(rename = "discountValue", default)]
    pub discount_value: f64,
}

impl Default for PriceBreakdown {
    fn default() -> Self {
        Self {
            base: 0.0,
            list: 0.0,
            final_price: 0.0,
            discount_type: None,
            discount_value: 0.0,
        }
    }
}
