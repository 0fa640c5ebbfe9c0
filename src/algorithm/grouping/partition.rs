//! Partitioning providers by grouping key

use rustc_hash::FxHashMap;

use super::fields::ProviderField;
use crate::models::Provider;

/// Providers sharing one grouping key
#[derive(Debug, Clone)]
pub struct ProviderPartition<'p> {
    pub key: &'p str,
    pub members: Vec<&'p Provider>,
}

/// Group providers by key, in first-seen key order
///
/// Providers without a key are left out. Member order follows input order.
#[must_use]
pub fn partition_by_key<'p>(
    providers: &[&'p Provider],
    key: ProviderField,
) -> Vec<ProviderPartition<'p>> {
    let mut positions: FxHashMap<&'p str, usize> = FxHashMap::default();
    let mut partitions: Vec<ProviderPartition<'p>> = Vec::new();

    for &provider in providers {
        let Some(value) = key(provider) else {
            continue;
        };

        match positions.get(value) {
            Some(&position) => partitions[position].members.push(provider),
            None => {
                positions.insert(value, partitions.len());
                partitions.push(ProviderPartition {
                    key: value,
                    members: vec![provider],
                });
            }
        }
    }

    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::grouping::fields;

    fn provider(ukprn: &str, country: Option<&str>) -> Provider {
        Provider {
            country_code: country.map(str::to_string),
            ..Provider::new(ukprn, format!("Provider {ukprn}"))
        }
    }

    #[test]
    fn partitions_keep_first_seen_order_and_drop_blank_keys() {
        let providers = vec![
            provider("1", Some("C2")),
            provider("2", Some("C1")),
            provider("3", Some("")),
            provider("4", Some("C2")),
            provider("5", None),
        ];
        let refs: Vec<&Provider> = providers.iter().collect();

        let partitions = partition_by_key(&refs, fields::country_code);

        let shape: Vec<(&str, Vec<&str>)> = partitions
            .iter()
            .map(|p| (p.key, p.members.iter().map(|m| m.ukprn.as_str()).collect()))
            .collect();
        assert_eq!(shape, vec![("C2", vec!["1", "4"]), ("C1", vec!["2"])]);
    }
}
