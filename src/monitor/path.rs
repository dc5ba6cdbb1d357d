use clap::ValueEnum;

use super::aggregation::LabelRole;
use crate::prom::Label;

pub const SEPARATOR: char = '|';

/// How a sample is turned into a metric path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PathShape {
    /// `endpoint|key=value|...|metric`, every label in document order.
    #[default]
    FreeForm,
    /// `cluster_id|topic|metric`, no endpoint segment.
    Fixed,
}

impl PathShape {
    pub fn build(self, endpoint_name: &str, labels: &[Label], metric_name: &str) -> String {
        match self {
            PathShape::FreeForm => free_form(endpoint_name, labels, metric_name),
            PathShape::Fixed => fixed(labels, metric_name),
        }
    }
}

fn free_form(endpoint_name: &str, labels: &[Label], metric_name: &str) -> String {
    let mut path = String::from(endpoint_name);
    path.push(SEPARATOR);
    if labels.is_empty() {
        path.push(SEPARATOR);
    }
    for label in labels {
        path.push_str(&label.key);
        path.push('=');
        path.push_str(&label.value);
        path.push(SEPARATOR);
    }
    path.push_str(metric_name);
    path
}

fn fixed(labels: &[Label], metric_name: &str) -> String {
    let first = |role: LabelRole| {
        labels
            .iter()
            .find(|label| LabelRole::of(&label.key) == Some(role))
            .map_or("", |label| label.value.as_str())
    };
    format!(
        "{cluster}{SEPARATOR}{resource}{SEPARATOR}{metric_name}",
        cluster = first(LabelRole::DistinctCluster),
        resource = first(LabelRole::DistinctResource),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<Label> {
        vec![
            Label::new("topic", "orders"),
            Label::new("kafka_id", "lkc-1"),
            Label::new("partition", "0"),
        ]
    }

    #[test]
    fn free_form_keeps_label_order() {
        assert_eq!(
            PathShape::FreeForm.build("Production", &labels(), "bytes"),
            "Production|topic=orders|kafka_id=lkc-1|partition=0|bytes"
        );
    }

    #[test]
    fn free_form_without_labels() {
        assert_eq!(PathShape::FreeForm.build("Production", &[], "bytes"), "Production||bytes");
    }

    #[test]
    fn fixed_uses_identifying_labels_only() {
        assert_eq!(PathShape::Fixed.build("Production", &labels(), "bytes"), "lkc-1|orders|bytes");
        assert_eq!(
            PathShape::Fixed.build("Production", &[Label::new("KAFKA_ID", "lkc-9")], "bytes"),
            "lkc-9||bytes"
        );
    }
}
