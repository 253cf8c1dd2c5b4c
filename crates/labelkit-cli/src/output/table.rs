use labelkit_core::engine::{FinalizedRow, PriceLadder, ValidationErrorSet};
use labelkit_core::export::csv::format_amount;
use labelkit_core::lookup::schema::{LookupTable, PriceTable};
use labelkit_core::parsing::ParsedOrder;

pub fn format_parsed(parsed: &ParsedOrder) -> String {
    let mut out = String::new();

    if let Some(first) = parsed.records.first() {
        let p = &first.pass_through;
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        out.push_str(&format!("Order:          {}\n", first.order_id));
        out.push_str(&format!("Style:          {}\n", first.style));
        out.push_str(&format!("Colour:         {}\n", first.colour));
        out.push_str(&format!("Classification: {}\n", field(&p.item_classification)));
        out.push_str(&format!("Department:     {}\n", first.department));
        out.push_str(&format!("Collection:     {}\n", field(&p.collection)));
        out.push_str(&format!("Supplier:       {}\n", field(&p.supplier_name)));
        out.push_str(&format!("{}\n", field(&p.batch)));
        out.push('\n');
    }

    out.push_str(&format!("{:<10}  {:<13}\n", "SKU", "Barcode"));
    for r in &parsed.records {
        out.push_str(&format!(
            "{:<10}  {:<13}\n",
            r.pass_through.sku.as_deref().unwrap_or("-"),
            r.barcode
        ));
    }

    if !parsed.warnings.is_empty() {
        out.push('\n');
        for w in &parsed.warnings {
            out.push_str(&format!("warning: {w}\n"));
        }
    }

    out
}

pub fn print_results(results: &[Result<FinalizedRow, ValidationErrorSet>], table: &LookupTable) {
    let ok = results.iter().filter(|r| r.is_ok()).count();
    println!("=== {} of {} record(s) finalized ===\n", ok, results.len());

    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(row) => {
                println!(
                    "  #{:<3} {}  {}  {}  wash {}",
                    i + 1,
                    row.barcode(),
                    row.department(),
                    row.product_type(),
                    row.washing_code().symbol_code
                );
                println!("        {}", ladder_line(row.price_ladder(), &table.prices));
            }
            Err(errors) => {
                println!("  #{:<3} rejected", i + 1);
                for e in errors.errors() {
                    println!("        {}: {}", e.field, e.error);
                }
            }
        }
    }
    println!();
}

pub fn print_ladder(ladder: &PriceLadder, prices: &PriceTable) {
    for entry in ladder.entries() {
        let marker = if entry.currency == ladder.reference_currency() {
            " (reference)"
        } else {
            ""
        };
        println!(
            "  {:<4} {:>10}{}",
            entry.currency,
            format_amount(entry.amount, prices.decimal_places_for(&entry.currency)),
            marker
        );
    }
}

fn ladder_line(ladder: &PriceLadder, prices: &PriceTable) -> String {
    ladder
        .entries()
        .iter()
        .map(|e| {
            format!(
                "{} {}",
                e.currency,
                format_amount(e.amount, prices.decimal_places_for(&e.currency))
            )
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn print_table_summary(table: &LookupTable) {
    println!("{} (v{})", table.name, table.version);
    println!("  Locales:      {}", table.locales.join(", "));
    println!("  Departments:  {}", table.departments().join(", "));
    println!("  Products:     {}", table.products.len());
    println!("  Materials:    {}", table.materials.len());
    println!(
        "  Washing:      {} code(s), {} rule(s)",
        table.washing_codes.len(),
        table.washing_rules.len()
    );
    println!(
        "  Currencies:   {} (reference {})",
        table.prices.currencies.join(", "),
        table.prices.reference_currency
    );
    println!("  Price points: {}", table.prices.price_points.len());
}
