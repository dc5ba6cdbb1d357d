mod model;
pub use self::model::Label;
pub use self::model::Line;
pub use self::model::MetricSample;
pub use self::model::ParsedDocument;
pub(crate) mod parser;
pub use self::parser::{parse_document, parse_labels, parse_line, LabelError, LineError};

mod metric_scraper;
pub use self::metric_scraper::{Fetch, FetchError, MetricScraper};

pub(crate) mod test_data;
