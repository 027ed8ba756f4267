// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::prelude::*;
use streamgate::core::kafka::{has_wildcard, BrokerEndpoint, KafkaConnectionString};

fn broker() -> impl Strategy<Value = BrokerEndpoint> {
    ("[a-z][a-z0-9.-]{0,12}", any::<u16>()).prop_map(|(host, port)| BrokerEndpoint::new(host, port))
}

fn render(scheme: &str, brokers: &[BrokerEndpoint], topic: &str) -> String {
    let list: Vec<String> = brokers.iter().map(ToString::to_string).collect();
    format!("{}{}/{}", scheme, list.join(","), topic)
}

proptest! {
    #[test]
    fn canonical_form_round_trips(
        brokers in prop::collection::vec(broker(), 1..6),
        topic in "[A-Za-z0-9_.-]{1,24}",
        secure in any::<bool>(),
    ) {
        let scheme = if secure { "kafkassl://" } else { "kafka://" };
        let parsed = KafkaConnectionString::parse(&render(scheme, &brokers, &topic)).unwrap();
        let reparsed = KafkaConnectionString::parse(&parsed.canonical()).unwrap();
        prop_assert_eq!(&reparsed, &parsed);
        prop_assert_eq!(reparsed.canonical(), parsed.canonical());
    }

    #[test]
    fn canonical_form_ignores_broker_order(
        brokers in prop::collection::vec(broker(), 1..6),
        topic in "[A-Za-z0-9_-]{1,24}",
    ) {
        let mut reversed = brokers.clone();
        reversed.reverse();

        let forward = KafkaConnectionString::parse(&render("kafka://", &brokers, &topic)).unwrap();
        let backward = KafkaConnectionString::parse(&render("kafka://", &reversed, &topic)).unwrap();
        prop_assert_eq!(forward.canonical(), backward.canonical());
    }

    #[test]
    fn leading_character_never_decides_wildcard(
        first in prop::sample::select(vec!['*', '?', '.', 'a']),
        rest in "[a-z0-9_-]{0,16}",
    ) {
        // only the first position holds a special character
        let topic = format!("{}{}", first, rest);
        prop_assert!(!has_wildcard(&topic));
    }
}

#[test]
fn broker_order_in_spec_example() {
    let a = KafkaConnectionString::parse("kafka://b2:9092,b1:9092/t").unwrap();
    let b = KafkaConnectionString::parse("kafka://b1:9092,b2:9092/t").unwrap();
    assert_eq!(a.canonical(), b.canonical());
}
