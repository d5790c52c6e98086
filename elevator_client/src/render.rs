//! Plain-text rendering of server responses.
use elevator_common::catalog::{CalcRule, CatalogRecord};
use elevator_common::invoice::Invoice;
use elevator_common::quote::Quote;

/// Format a whole currency amount with thousands separators, e.g. `37,360,000`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a quantity without a fractional part when it is whole.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.2}", quantity)
    }
}

/// Print the lines and grand total of a quote.
pub fn print_quote(quote: &Quote) {
    println!(
        "{:>4} {:>6}  {:<48} {:<8} {:>8} {:>14} {:>16}",
        "#", "item", "name", "unit", "qty", "unit price", "total"
    );
    for (row, line) in quote.items().iter().enumerate() {
        println!(
            "{:>4} {:>6}  {:<48} {:<8} {:>8} {:>14} {:>16}",
            row + 1,
            line.item_id,
            line.name,
            line.unit,
            format_quantity(line.quantity),
            format_amount(line.unit_price.round() as i64),
            format_amount(line.total_price)
        );
    }
    println!("{:>112}", format!("grand total: {}", format_amount(quote.grand_total())));
}

/// Print catalog records, one per line.
pub fn print_records(records: &[CatalogRecord]) {
    for record in records {
        print_record(record);
    }
    println!("{} records", records.len());
}

/// Print one catalog record.
pub fn print_record(record: &CatalogRecord) {
    let rule = CalcRule::from_record(record);
    let formula = match &rule {
        CalcRule::Fixed { quantity } => format!("fixed {}", format_quantity(*quantity)),
        CalcRule::PerStop => "per stop".to_string(),
        CalcRule::Ratio { stops, quantity } => format!("{} stops : {}", stops, quantity),
        CalcRule::StopCount => "stop count".to_string(),
        CalcRule::Coefficient {
            coefficient,
            base_quantity,
        } => format!(
            "stops x {} + {}",
            format_quantity(*coefficient),
            format_quantity(*base_quantity)
        ),
        CalcRule::Unusable { calc_type } => format!("unusable ({})", calc_type),
    };
    println!(
        "{:>6}  {:<10} {:<48} {:<8} {:>14}  {:<20} {}",
        record.item_id,
        record.category,
        record.name,
        record.unit,
        format_amount(record.unit_price.round() as i64),
        formula,
        if record.is_active { "" } else { "(inactive)" }
    );
}

/// Print an invoice header followed by its lines.
pub fn print_invoice(invoice: &Invoice) {
    println!(
        "{} (id {})  {}  {}  {} stops  [{}]",
        invoice.invoice_number,
        invoice.id,
        invoice.customer_name,
        invoice.system_type,
        invoice.stop_count.get(),
        invoice.status
    );
    println!("created {}  updated {}", invoice.created_at, invoice.updated_at);
    if let Some(notes) = &invoice.notes {
        println!("notes: {}", notes);
    }
    print_quote(&invoice.quote);
}

/// Print a one-line summary per invoice.
pub fn print_invoices(invoices: &[Invoice]) {
    for invoice in invoices {
        println!(
            "{:>6}  {:<16} {:<24} {:<10} {:>3} {:<10} {:>16}",
            invoice.id,
            invoice.invoice_number,
            invoice.customer_name,
            invoice.system_type,
            invoice.stop_count.get(),
            invoice.status,
            format_amount(invoice.grand_total())
        );
    }
    println!("{} invoices", invoices.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(37_360_000), "37,360,000");
        assert_eq!(format_amount(-1_234_567), "-1,234,567");
    }

    #[test]
    fn quantities_drop_zero_fraction() {
        assert_eq!(format_quantity(1930.0), "1930");
        assert_eq!(format_quantity(2.5), "2.50");
        assert_eq!(format_quantity(-1.0), "-1");
    }
}
