pub mod record;
pub mod request;
pub mod response;

pub use record::{CategoryMatch, ParsedProductRecord, QaRecord, VariantRecord};
pub use request::CommitRequest;
pub use response::{CommitResult, ImportPreview, ImportSummary, InvalidRow, RowError};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportProducts;

impl UseCaseMetadata for ImportProducts {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_products"
    }

    fn display_name() -> &'static str {
        "Bulk product import"
    }

    fn description() -> &'static str {
        "Preview and commit of seller products uploaded as an xlsx/csv spreadsheet"
    }
}
