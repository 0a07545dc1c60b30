use contracts::usecases::u501_import_products::CategoryMatch;

/// Справочный элемент (категория/бренд) в снимке для импорта
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Автоподбор категории по тексту товара
pub trait CategoryMatcher: Send + Sync {
    fn best_match(&self, text: &str, categories: &[NamedRef]) -> Option<CategoryMatch>;
}

/// Минимальный балл, с которого подбор считается успешным (строго больше)
pub const MIN_MATCH_SCORE: usize = 3;

/// Лексический подбор: полное вхождение имени категории дает длину имени,
/// каждое слово имени длиннее 2 символов, найденное в тексте, дает свою длину.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalCategoryMatcher;

impl LexicalCategoryMatcher {
    pub fn score(text: &str, category_name: &str) -> usize {
        let text = text.to_lowercase();
        let name = category_name.trim().to_lowercase();
        if name.is_empty() {
            return 0;
        }

        let mut score = 0;
        if text.contains(&name) {
            score += name.chars().count();
        }
        for word in name.split_whitespace() {
            let len = word.chars().count();
            if len > 2 && text.contains(word) {
                score += len;
            }
        }
        score
    }
}

impl CategoryMatcher for LexicalCategoryMatcher {
    fn best_match(&self, text: &str, categories: &[NamedRef]) -> Option<CategoryMatch> {
        let mut best: Option<CategoryMatch> = None;
        for category in categories {
            let score = Self::score(text, &category.name);
            // при равенстве остается первая категория
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(CategoryMatch {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    score,
                });
            }
        }
        best.filter(|b| b.score > MIN_MATCH_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(names: &[&str]) -> Vec<NamedRef> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| NamedRef::new(format!("c{}", i + 1), *n))
            .collect()
    }

    #[test]
    fn test_score_substring_and_words() {
        assert_eq!(LexicalCategoryMatcher::score("Red Coffee Mug", "Mug"), 6);
        assert_eq!(LexicalCategoryMatcher::score("red mug", "Mugs & Cups"), 0);
        assert_eq!(
            LexicalCategoryMatcher::score("Steel kitchen knife", "Kitchen Knives"),
            7
        );
    }

    #[test]
    fn test_best_match_picks_highest() {
        let cats = categories(&["Mug", "Coffee Mugs", "Tea"]);
        let found = LexicalCategoryMatcher
            .best_match("Red Coffee Mug for the office", &cats)
            .unwrap();
        assert_eq!(found.id, "c1");
        assert_eq!(found.score, 6);
    }

    #[test]
    fn test_tie_keeps_first() {
        let cats = categories(&["Lamp", "lamp"]);
        let found = LexicalCategoryMatcher.best_match("desk lamp", &cats).unwrap();
        assert_eq!(found.id, "c1");
    }

    #[test]
    fn test_low_score_rejected() {
        let cats = categories(&["Mugs & Cups", "Tea"]);
        assert!(LexicalCategoryMatcher.best_match("Red Mug", &cats).is_none());
        // "tea" дает 3 + 3 = 6
        assert!(LexicalCategoryMatcher.best_match("green tea", &cats).is_some());
        // ровно 3: недостаточно
        let cats = categories(&["Hat Box"]);
        assert!(LexicalCategoryMatcher.best_match("a hat", &cats).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(LexicalCategoryMatcher.best_match("anything", &[]).is_none());
    }
}
