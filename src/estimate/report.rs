//! Text report
//!
//! Line-oriented rendering of the estimation: one block per resource and a
//! summary block at the end.

use crate::azure::id::ResourceId;
use crate::pricing::item::CatalogItem;
use crate::whatif::ChangeType;
use std::fmt;

pub const SEPARATOR: &str = "-------------------------------";

/// Two decimals with `,` thousands grouping
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// `+` in front of non-negative amounts; negative amounts keep only their own `-`
pub fn signed_amount(value: f64) -> String {
    let sign = if value < 0.0 { "" } else { "+" };
    format!("{}{}", sign, format_amount(value))
}

/// Everything the report prints about one priced resource
#[derive(Debug, Clone)]
pub struct ResourceSection<'a> {
    pub id: &'a ResourceId,
    pub change_type: ChangeType,
    pub location: &'a str,
    pub total_cost: f64,
    pub delta: Option<f64>,
    /// `None` when detailed metrics are disabled
    pub items: Option<Vec<&'a CatalogItem>>,
}

/// Accumulated report lines
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    currency: String,
    lines: Vec<String>,
}

impl Report {
    pub fn new(currency: &str) -> Self {
        let mut report = Self {
            currency: currency.to_string(),
            lines: Vec::new(),
        };
        report.line("Estimations:");
        report.blank();
        report
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn separator(&mut self) {
        self.blank();
        self.line(SEPARATOR);
        self.blank();
    }

    fn header(&mut self, id: &ResourceId, change_type: ChangeType) {
        self.line(format!("{} {}", change_type.marker(), id.name()));
        self.line(format!("  Type: {}", id.resource_type()));
    }

    pub fn resource(&mut self, section: &ResourceSection<'_>) {
        let delta = match section.delta {
            None => format!("+{}", format_amount(section.total_cost)),
            Some(delta) => signed_amount(delta),
        };

        self.header(section.id, section.change_type);
        self.line(format!("  Location: {}", section.location));
        self.line(format!(
            "  Total cost: {} {}",
            format_amount(section.total_cost),
            self.currency
        ));
        self.line(format!("  Delta: {} {}", delta, self.currency));

        if let Some(items) = &section.items {
            self.blank();
            self.line("Aggregated metrics:");
            self.blank();

            if items.is_empty() {
                self.line("No metrics available.");
            }
            for item in items {
                self.line(format!(
                    "-> {} | {} | {} | {} for {}",
                    item.sku_name, item.product_name, item.meter_name, item.retail_price, item.unit_of_measure
                ));
            }
        }

        self.separator();
    }

    pub fn free_resource(&mut self, id: &ResourceId, change_type: ChangeType) {
        self.header(id, change_type);
        self.line("  Total cost: Free");
        self.separator();
    }

    pub fn summary(&mut self, total_cost: f64, delta: f64, estimated: usize, unsupported: &[ResourceId]) {
        if estimated == 0 {
            self.line("No resource available for estimation.");
            self.separator();
        }

        if !unsupported.is_empty() {
            self.line("Unsupported resources:");
            self.blank();
            for id in unsupported {
                self.line(format!("{} [{}]", id.name(), id.resource_type()));
            }
            self.separator();
        }

        self.line("Summary:");
        self.blank();
        self.line(format!("Total cost: {} {}", format_amount(total_cost), self.currency));
        self.line(format!("Delta: {} {}", signed_amount(delta), self.currency));
        self.blank();
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
