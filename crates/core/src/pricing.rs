//! Quote pricing engine.
//!
//! Pure functions turning the billable items of a job's operations into
//! priced quote lines and totals. No persistence, no I/O; the same input
//! always produces the same output.
//!
//! Pricing rule: when an item carries a list price greater than zero, the
//! effective unit price is `list_price × (1 − discount_pct/100)`;
//! otherwise the flat price applies. Quantity applies to parts only.
//! Rounding happens exactly once, at the tax step, to avoid compounding
//! per-line rounding error.

use serde::{Deserialize, Serialize};

/// VAT rate applied to the job subtotal.
pub const TAX_RATE: f64 = 0.20;

/// A changed part as priced input (one row of an operation's worksheet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartItem {
    pub name: String,
    /// Always >= 1; enforced by the database schema.
    pub quantity: i32,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// A labour/service item as priced input. Quantity is implicitly 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// The billable items of a single operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkSheet {
    pub parts: Vec<PartItem>,
    pub services: Vec<ServiceEntry>,
}

/// What kind of work a quote line bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Part,
    Service,
}

/// One line of a priced quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLine {
    pub description: String,
    pub kind: LineKind,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Aggregated totals for a quoted job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

/// A fully priced quote for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub totals: QuoteTotals,
}

/// Round to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The unit price actually charged for an item.
///
/// A present, positive list price wins over the flat price and has the
/// discount percentage applied; a missing or zero list price means the
/// flat price is already final.
pub fn effective_price(price: f64, list_price: Option<f64>, discount_pct: Option<f64>) -> f64 {
    match list_price {
        Some(list) if list > 0.0 => list * (1.0 - discount_pct.unwrap_or(0.0) / 100.0),
        _ => price,
    }
}

/// Compute totals from an unrounded subtotal.
///
/// Tax is rounded here, once; the subtotal itself is carried unrounded
/// into the grand total so per-line error cannot compound.
fn totals_from_subtotal(subtotal: f64) -> QuoteTotals {
    let tax = round2(subtotal * TAX_RATE);
    QuoteTotals {
        subtotal,
        tax,
        grand_total: subtotal + tax,
    }
}

/// Price a job from the worksheets of its operations.
///
/// Returns one quote line per part/service across all operations, plus
/// subtotal, tax and grand total.
pub fn price_worksheets(worksheets: &[WorkSheet]) -> Quote {
    let mut lines = Vec::new();
    let mut subtotal = 0.0;

    for sheet in worksheets {
        for part in &sheet.parts {
            let unit = effective_price(part.price, part.list_price, part.discount_pct);
            let line_total = unit * part.quantity as f64;
            subtotal += line_total;
            lines.push(QuoteLine {
                description: part.name.clone(),
                kind: LineKind::Part,
                quantity: part.quantity,
                unit_price: unit,
                line_total,
            });
        }
        for service in &sheet.services {
            let unit = effective_price(service.price, service.list_price, service.discount_pct);
            subtotal += unit;
            lines.push(QuoteLine {
                description: service.name.clone(),
                kind: LineKind::Service,
                quantity: 1,
                unit_price: unit,
                line_total: unit,
            });
        }
    }

    Quote {
        lines,
        totals: totals_from_subtotal(subtotal),
    }
}

/// Price a job that has no logged operations yet.
///
/// Supports quoting before any work is recorded: the caller supplies a
/// parts estimate and a services estimate, and the quote is their sum.
pub fn price_estimates(parts_estimate: f64, services_estimate: f64) -> QuoteTotals {
    totals_from_subtotal(parts_estimate + services_estimate)
}
