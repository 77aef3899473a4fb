use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use tracing::{debug, warn};

use crate::models::{
    AreaStyle, AxisFormatter, AxisGroup, AxisLine, ChartPlan, ChartRecord, Gradient, Hallmark,
    MarkLine, Marker, MarkerAnchor, MarkerLabel, PlanOptions, Series, SeriesPoint, SeriesType,
    SeriesValue, Stack, Theme,
};
use crate::utils::format::string_to_colour;

/// Horizontal distance between stacked axes, and vertical step between hallmark labels
pub const AXIS_OFFSET_STEP: u32 = 40;
pub const HALLMARK_LABEL_STEP: u32 = 40;

/// Axis used by stacks missing from the compatibility table
pub const FALLBACK_AXIS: usize = 0;

/// Label formatter attached to a compatibility group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterKind {
    Default,
    Compact,
    /// Compact, suffixed with the unlock token symbol
    CompactWithUnlockSymbol,
    Percent,
}

/// One row of the compatibility table
#[derive(Debug)]
pub struct AxisGroupSpec {
    pub members: &'static [Stack],
    pub formatter: FormatterKind,
    /// Stack whose explicit color tints the axis line; None keeps the plain default axis
    pub line_color_key: Option<Stack>,
}

impl AxisGroupSpec {
    /// Group identifier: member names joined with `+`
    pub fn id(&self) -> String {
        self.members
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Compatibility groups in axis order. Every stack appears in exactly one group.
pub static AXIS_GROUPS: [AxisGroupSpec; 15] = [
    AxisGroupSpec {
        members: &[Stack::Tvl, Stack::Mcap, Stack::Fdv, Stack::Borrowed, Stack::Staking],
        formatter: FormatterKind::Default,
        line_color_key: None,
    },
    AxisGroupSpec {
        members: &[Stack::TokenPrice],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::TokenPrice),
    },
    AxisGroupSpec {
        members: &[Stack::TokenVolume],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::TokenVolume),
    },
    AxisGroupSpec {
        members: &[Stack::TokenLiquidity],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::TokenLiquidity),
    },
    AxisGroupSpec {
        members: &[Stack::BridgeDeposits, Stack::BridgeWithdrawals],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::BridgeDeposits),
    },
    AxisGroupSpec {
        members: &[Stack::Volume, Stack::Fees, Stack::Revenue],
        formatter: FormatterKind::Default,
        line_color_key: None,
    },
    AxisGroupSpec {
        members: &[Stack::Unlocks],
        formatter: FormatterKind::CompactWithUnlockSymbol,
        line_color_key: Some(Stack::Unlocks),
    },
    AxisGroupSpec {
        members: &[Stack::ActiveUsers, Stack::NewUsers],
        formatter: FormatterKind::Compact,
        line_color_key: None,
    },
    AxisGroupSpec {
        members: &[Stack::Transactions],
        formatter: FormatterKind::Compact,
        line_color_key: Some(Stack::Transactions),
    },
    AxisGroupSpec {
        members: &[Stack::GasUsed],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::GasUsed),
    },
    AxisGroupSpec {
        members: &[Stack::MedianApy],
        formatter: FormatterKind::Percent,
        line_color_key: Some(Stack::MedianApy),
    },
    AxisGroupSpec {
        members: &[Stack::UsdInflows],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::UsdInflows),
    },
    AxisGroupSpec {
        members: &[Stack::TotalProposals, Stack::SuccessfulProposals],
        formatter: FormatterKind::Compact,
        line_color_key: Some(Stack::TotalProposals),
    },
    AxisGroupSpec {
        members: &[Stack::MaxVotes],
        formatter: FormatterKind::Compact,
        line_color_key: Some(Stack::MaxVotes),
    },
    AxisGroupSpec {
        members: &[Stack::Treasury],
        formatter: FormatterKind::Default,
        line_color_key: Some(Stack::Treasury),
    },
];

lazy_static! {
    /// Stack -> position of its group in AXIS_GROUPS
    static ref STACK_GROUP: HashMap<Stack, usize> = {
        let mut map = HashMap::new();
        for (pos, spec) in AXIS_GROUPS.iter().enumerate() {
            for member in spec.members {
                map.insert(*member, pos);
            }
        }
        map
    };
}

/// True when the view's `groupBy` query parameter selects the cumulative view
pub fn is_cumulative_view(group_by: Option<&str>) -> bool {
    group_by == Some("cumulative")
}

/// Stacks present in the records: known stacks in table order, then unrecognized names sorted
pub fn default_stacks(records: &[ChartRecord]) -> Vec<String> {
    let present: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.values.keys().map(String::as_str))
        .collect();

    let mut stacks: Vec<String> = AXIS_GROUPS
        .iter()
        .flat_map(|spec| spec.members.iter())
        .filter(|s| present.contains(s.name()))
        .map(|s| s.name().to_string())
        .collect();

    stacks.extend(
        present
            .iter()
            .filter(|name| Stack::from_name(name).is_none())
            .map(|name| name.to_string()),
    );

    stacks
}

/// Build the chart configuration for the requested stacks
///
/// Pure function of its inputs: the same stacks, records and options always
/// produce the same plan.
pub fn plan(stacks: &[String], records: &[ChartRecord], options: &PlanOptions) -> ChartPlan {
    // Drop repeated stacks; only the first occurrence gets data
    let mut seen = BTreeSet::new();
    let mut names: Vec<&str> = Vec::with_capacity(stacks.len());
    for name in stacks {
        if seen.insert(name.as_str()) {
            names.push(name.as_str());
        } else {
            warn!("Stack '{}' requested more than once, ignoring duplicate", name);
        }
    }

    let requested: Vec<Option<Stack>> = names.iter().map(|n| Stack::from_name(n)).collect();

    // Materialize groups in table order; table position -> axis index
    let mut axis_by_group: HashMap<usize, usize> = HashMap::new();
    let mut axis_groups: Vec<AxisGroup> = Vec::new();
    for (pos, spec) in AXIS_GROUPS.iter().enumerate() {
        if !spec.members.iter().any(|m| requested.contains(&Some(*m))) {
            continue;
        }
        let index = axis_groups.len();
        axis_by_group.insert(pos, index);
        axis_groups.push(build_axis_group(spec, index, options));
    }

    if axis_groups.is_empty() {
        debug!("No compatibility group matched, emitting a default axis");
        axis_groups.push(AxisGroup {
            id: "default".to_string(),
            index: FALLBACK_AXIS,
            offset: 0,
            formatter: AxisFormatter::Default,
            axis_line: None,
        });
    }

    assign_offsets(&mut axis_groups);

    let chart_color = options
        .color
        .clone()
        .unwrap_or_else(|| string_to_colour(&options.title));

    let mut series: Vec<Series> = names
        .iter()
        .zip(requested.iter())
        .enumerate()
        .map(|(position, (name, stack))| {
            let axis = stack
                .and_then(|s| STACK_GROUP.get(&s))
                .and_then(|pos| axis_by_group.get(pos))
                .copied();
            let y_axis_index = match axis {
                Some(index) => index,
                None => {
                    warn!("Unrecognized stack '{}', using fallback axis {}", name, FALLBACK_AXIS);
                    FALLBACK_AXIS
                }
            };
            build_series(position, name, *stack, y_axis_index, &chart_color, records, options)
        })
        .collect();

    if !options.hallmarks.is_empty() {
        if let Some(first) = series.first_mut() {
            first.mark_line = hallmark_markers(&options.hallmarks, options.theme);
        }
    }

    debug!(
        "Planned {} series on {} axes ({} hallmarks, cumulative: {})",
        series.len(),
        axis_groups.len(),
        options.hallmarks.len(),
        options.is_cumulative
    );

    ChartPlan {
        legend_visible: series.len() > 1,
        series,
        axis_groups,
    }
}

fn build_axis_group(spec: &AxisGroupSpec, index: usize, options: &PlanOptions) -> AxisGroup {
    let formatter = match spec.formatter {
        FormatterKind::Default => AxisFormatter::Default,
        FormatterKind::Compact => AxisFormatter::Compact { suffix: None },
        FormatterKind::CompactWithUnlockSymbol => AxisFormatter::Compact {
            suffix: Some(options.unlock_token_symbol.clone()).filter(|s| !s.is_empty()),
        },
        FormatterKind::Percent => AxisFormatter::Percent,
    };

    let axis_line = spec.line_color_key.map(|key| AxisLine {
        color: options.stack_colors.get(key.name()).cloned(),
    });

    AxisGroup {
        id: spec.id(),
        index,
        offset: 0,
        formatter,
        axis_line,
    }
}

/// Axes 0 and 1 sit on the chart edges; later axes step outward from the previous one.
/// With fewer than three axes nothing is offset.
fn assign_offsets(groups: &mut [AxisGroup]) {
    let no_offset = groups.len() < 3;
    let mut previous = 0;
    for group in groups.iter_mut() {
        group.offset = if no_offset || group.index < 2 {
            0
        } else {
            previous + AXIS_OFFSET_STEP
        };
        previous = group.offset;
    }
}

fn build_series(
    position: usize,
    name: &str,
    stack: Option<Stack>,
    y_axis_index: usize,
    chart_color: &str,
    records: &[ChartRecord],
    options: &PlanOptions,
) -> Series {
    let bar_eligible = stack.map_or(false, Stack::is_bar_eligible);
    let kind = if bar_eligible && !options.is_cumulative {
        SeriesType::Bar
    } else {
        SeriesType::Line
    };

    let explicit_color = options.stack_colors.get(name);

    let area_style = match kind {
        SeriesType::Bar => None,
        SeriesType::Line => {
            let color = if options.custom_legend_name.is_some() {
                None
            } else {
                let top = match explicit_color {
                    Some(c) => c.clone(),
                    None if position == 0 => chart_color.to_string(),
                    None => "transparent".to_string(),
                };
                Some(Gradient {
                    top,
                    bottom: options.theme.gradient_base().to_string(),
                })
            };
            Some(AreaStyle { color })
        }
    };

    let data = records
        .iter()
        .map(|record| SeriesPoint(record.timestamp(), fill_value(record, name, stack)))
        .collect();

    Series {
        name: name.to_string(),
        kind,
        y_axis_index,
        color: explicit_color
            .cloned()
            .unwrap_or_else(|| string_to_colour(name)),
        area_style,
        mark_line: MarkLine::default(),
        data,
    }
}

/// TVL gaps plot as zero (filled area); every other stack gaps as "no data"
fn fill_value(record: &ChartRecord, name: &str, stack: Option<Stack>) -> SeriesValue {
    match record.value(name) {
        Some(v) => SeriesValue::Number(v),
        None if stack == Some(Stack::Tvl) => SeriesValue::Number(0.0),
        None => SeriesValue::Missing,
    }
}

/// One start/end marker pair per hallmark; end labels step down 40px per hallmark, floor 40
pub fn hallmark_markers(hallmarks: &[Hallmark], theme: Theme) -> MarkLine {
    let count = hallmarks.len() as u32;

    let data = hallmarks
        .iter()
        .enumerate()
        .map(|(i, hallmark)| {
            let x_axis = hallmark.timestamp();
            let y = (count * HALLMARK_LABEL_STEP)
                .saturating_sub(i as u32 * HALLMARK_LABEL_STEP)
                .max(HALLMARK_LABEL_STEP);

            [
                Marker {
                    name: hallmark.label().to_string(),
                    x_axis,
                    y_axis: MarkerAnchor::Zero,
                    label: Some(MarkerLabel {
                        color: theme.label_color().to_string(),
                        font_family: "sans-serif".to_string(),
                        font_size: 14,
                        font_weight: 500,
                    }),
                    y: None,
                },
                Marker {
                    name: "end".to_string(),
                    x_axis,
                    y_axis: MarkerAnchor::Max,
                    label: None,
                    y: Some(y),
                },
            ]
        })
        .collect();

    MarkLine { data }
}
