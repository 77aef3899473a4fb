use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{ExtraTvlKey, ExtraTvlRow, ExtraTvlToggles, HistoricalSection, TvlAggregate};

/// Internal bookkeeping categories left out of the per-chain table
const HIDDEN_SECTIONS: [&str; 2] = ["masterchef", "offers"];

/// Breakdown section excluded from the headline total
const OFFERS: &str = "offers";

const DOUBLE_COUNTED: &str = "doublecounted";

fn is_hidden(name: &str) -> bool {
    HIDDEN_SECTIONS.contains(&name)
}

fn starts_lowercase(name: &str) -> bool {
    name.chars()
        .next()
        .map_or(false, |c| c.to_lowercase().eq(std::iter::once(c)))
}

/// Fold a `tvlByChain` list into per-chain totals and the toggleable extra rows
///
/// - `masterchef` / `offers` are skipped
/// - lowercase names matching an extra key become extra rows, never folded into a chain
/// - `<chain>` is a whole-chain total
/// - `<chain>-<category>` is added to `<chain>` only when the category is toggled on
pub fn aggregate(tvl_by_chain: &[(String, f64)], toggles: &ExtraTvlToggles) -> TvlAggregate {
    let mut per_chain: Vec<(String, f64)> = Vec::new();
    let mut chain_slot: HashMap<String, usize> = HashMap::new();
    let mut extra_rows: Vec<ExtraTvlRow> = Vec::new();

    let mut add_to_chain = |chain: &str, amount: f64| {
        let slot = *chain_slot.entry(chain.to_string()).or_insert_with(|| {
            per_chain.push((chain.to_string(), 0.0));
            per_chain.len() - 1
        });
        per_chain[slot].1 += amount;
    };

    for (name, amount) in tvl_by_chain {
        if is_hidden(name) {
            continue;
        }

        if starts_lowercase(name) {
            if let Some(key) = ExtraTvlKey::from_key(name) {
                extra_rows.push(ExtraTvlRow {
                    key,
                    label: key.label(),
                    help: key.help(),
                    amount: *amount,
                    enabled: toggles.is_enabled(key.key()),
                });
                continue;
            }
        }

        let mut parts = name.split('-');
        let chain = parts.next().unwrap_or_default();
        match parts.next() {
            None => add_to_chain(chain, *amount),
            Some(category) => {
                if toggles.is_enabled(category) {
                    add_to_chain(chain, *amount);
                } else {
                    debug!("Skipping '{}': '{}' is not toggled on", name, category);
                }
            }
        }
    }

    let total = per_chain.iter().map(|(_, v)| v).sum();

    TvlAggregate {
        total,
        per_chain,
        extra_rows,
    }
}

/// Headline TVL figure
///
/// Walks the top-level breakdown sections, skipping chain-qualified ones and
/// `offers`. `doublecounted` is always subtracted; toggleable sections count
/// only when enabled; everything else (`masterchef` included) is added. An
/// empty breakdown falls back to the latest snapshot of each historical
/// section under the same rules, where only chain-qualified sections are skipped.
pub fn headline_tvl(
    tvl_breakdowns: &BTreeMap<String, f64>,
    historical: &BTreeMap<String, HistoricalSection>,
    toggles: &ExtraTvlToggles,
) -> f64 {
    let tvl = sum_sections(
        tvl_breakdowns
            .iter()
            .filter(|(section, _)| section.as_str() != OFFERS)
            .map(|(section, amount)| (section.as_str(), *amount)),
        toggles,
    );

    if tvl == 0.0 && tvl_breakdowns.is_empty() {
        debug!("Breakdown is empty, using latest historical snapshots");
        return sum_sections(
            historical
                .iter()
                .filter_map(|(section, data)| data.latest().map(|amount| (section.as_str(), amount))),
            toggles,
        );
    }

    tvl
}

fn sum_sections<'a>(sections: impl Iterator<Item = (&'a str, f64)>, toggles: &ExtraTvlToggles) -> f64 {
    let mut tvl = 0.0;

    for (section, amount) in sections {
        if section.contains('-') {
            continue;
        }

        if section.eq_ignore_ascii_case(DOUBLE_COUNTED) {
            tvl -= amount;
        } else if ExtraTvlToggles::is_toggleable(section) {
            if toggles.is_enabled(section) {
                tvl += amount;
            }
        } else {
            tvl += amount;
        }
    }

    tvl
}

/// Most recent snapshot of one historical section, e.g. staked or borrowed amounts
pub fn latest_section_amount(historical: &BTreeMap<String, HistoricalSection>, section: &str) -> Option<f64> {
    historical.get(section).and_then(HistoricalSection::latest)
}
