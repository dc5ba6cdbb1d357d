#![cfg(test)]

pub const CLOUD_EXPORT: &str = r#"# HELP confluent_kafka_server_received_bytes The delta count of bytes of the customer's data received from the network.
# TYPE confluent_kafka_server_received_bytes gauge
confluent_kafka_server_received_bytes{kafka_id="lkc-1",topic="orders"} 42.0 1700000000000
confluent_kafka_server_received_bytes{kafka_id="lkc-1",topic="payments"} 10.5 1700000000000
confluent_kafka_server_received_bytes{kafka_id="lkc-1",topic="_confluent-command"} 3.0 1700000000000

# HELP confluent_kafka_server_partition_count The number of partitions.
# TYPE confluent_kafka_server_partition_count gauge
confluent_kafka_server_partition_count{kafka_id="lkc-1"} 12.0 1700000000000
garbage text here
confluent_kafka_server_retained_bytes{kafka_id="lkc-1",topic="orders",partition="0"} 1.5e3 1700000000000
"#;

pub const CLOUD_EXPORT_SAMPLES: usize = 5;

pub const SECOND_CLUSTER_EXPORT: &str = r#"# TYPE confluent_kafka_server_received_bytes gauge
confluent_kafka_server_received_bytes{kafka_id="lkc-2",topic="orders"} 7.0 1700000060000
confluent_kafka_server_received_bytes{kafka_id="lkc-2",topic="audit"} 1.25 1700000060000
"#;
