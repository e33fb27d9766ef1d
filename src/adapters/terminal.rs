use crate::domain::model::Car;
use crate::domain::ports::{Severity, View};
use std::io::Write;

/// Renders listings as a plain-text table.
///
/// Notifications are written as they arrive. Renders replace each other and
/// only the last one is printed, by [`TerminalView::print_table`].
pub struct TerminalView<W: Write> {
    out: W,
    current_year: i32,
    table: Option<(Vec<Car>, Option<usize>)>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, current_year: i32) -> Self {
        Self {
            out,
            current_year,
            table: None,
        }
    }

    pub fn print_table(&mut self) -> std::io::Result<()> {
        let Some((cars, highlight)) = self.table.take() else {
            return Ok(());
        };
        if cars.is_empty() {
            return writeln!(self.out, "No listings to show.");
        }

        let header = [
            "#", "Plate", "Maker", "Model", "Owner", "Year", "Color", "Price", "Discounted",
        ];
        let rows: Vec<Vec<String>> = cars
            .iter()
            .enumerate()
            .map(|(i, car)| {
                let marker = if highlight == Some(i) { "*" } else { "" };
                vec![
                    format!("{}{}", marker, i + 1),
                    car.license_plate().to_string(),
                    car.maker().to_string(),
                    car.model().to_string(),
                    car.owner().to_string(),
                    car.year().to_string(),
                    car.color().to_string(),
                    format_price(car.price()),
                    car.discounted_price_at(self.current_year)
                        .map(format_price)
                        .unwrap_or_else(|| "---".to_string()),
                ]
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                rows.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        for row in std::iter::once(&header).chain(rows.iter()) {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            writeln!(self.out, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, cars: &[Car], highlight: Option<usize>) {
        self.table = Some((cars.to_vec(), highlight));
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        let result = match severity {
            Severity::Success => writeln!(self.out, "✅ {}", message),
            Severity::Error => writeln!(self.out, "❌ {}", message),
        };
        if let Err(e) = result {
            tracing::error!("Failed to write notification: {}", e);
        }
    }
}

/// `$12000`, or `$8499.15` when there are cents.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}
