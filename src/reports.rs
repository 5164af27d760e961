//! Sales report aggregation and CSV export.

use std::collections::HashMap;
use std::path::Path;

use csv::WriterBuilder;
use log::{debug, info};
use serde::Serialize;

use crate::error::{PosError, Result};
use crate::models::User;
use crate::store::SalesData;

/// Units and revenue of one product name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Sales attributed to one seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerSales {
    pub seller_id: i64,
    pub seller: String,
    pub sale_count: usize,
    pub total: f64,
}

/// Amount collected with one payment method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSales {
    pub method: String,
    pub amount: f64,
}

/// Aggregated view over every recorded sale.
///
/// Lists are sorted by amount, largest first, ties by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub sale_count: usize,
    pub total_sales: f64,
    pub sales_by_product: Vec<ProductSales>,
    pub sales_by_seller: Vec<SellerSales>,
    pub sales_by_payment_method: Vec<MethodSales>,
}

#[derive(Serialize)]
struct CsvLine<'a> {
    section: &'a str,
    key: &'a str,
    quantity: String,
    amount: String,
}

fn by_amount_then_name(a: (f64, &str), b: (f64, &str)) -> std::cmp::Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

impl ReportData {
    pub fn build(data: &SalesData, users: &[User]) -> Self {
        let names: HashMap<i64, &str> = users
            .iter()
            .map(|u| (u.id, u.full_name.as_str()))
            .collect();

        let mut products: HashMap<String, ProductSales> = HashMap::new();
        let mut sellers: HashMap<i64, SellerSales> = HashMap::new();
        let mut methods: HashMap<String, f64> = HashMap::new();
        let mut total_sales = 0.0;

        for sale in &data.sales {
            total_sales += sale.record.total;

            let seller_id = sale.record.seller_id;
            let seller = sellers.entry(seller_id).or_insert_with(|| SellerSales {
                seller_id,
                seller: names
                    .get(&seller_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("ID {seller_id}")),
                sale_count: 0,
                total: 0.0,
            });
            seller.sale_count += 1;
            seller.total += sale.record.total;

            for line in &sale.items {
                let entry = products
                    .entry(line.name.clone())
                    .or_insert_with(|| ProductSales {
                        name: line.name.clone(),
                        quantity: 0,
                        revenue: 0.0,
                    });
                entry.quantity += line.item.quantity;
                entry.revenue += line.item.sale_price * line.item.quantity as f64;
            }

            for payment in &sale.payments {
                *methods.entry(payment.method.clone()).or_insert(0.0) += payment.amount;
            }
        }

        let mut sales_by_product: Vec<ProductSales> = products.into_values().collect();
        sales_by_product.sort_by(|a, b| {
            by_amount_then_name((a.revenue, a.name.as_str()), (b.revenue, b.name.as_str()))
        });

        let mut sales_by_seller: Vec<SellerSales> = sellers.into_values().collect();
        sales_by_seller.sort_by(|a, b| {
            by_amount_then_name((a.total, a.seller.as_str()), (b.total, b.seller.as_str()))
        });

        let mut sales_by_payment_method: Vec<MethodSales> = methods
            .into_iter()
            .map(|(method, amount)| MethodSales { method, amount })
            .collect();
        sales_by_payment_method.sort_by(|a, b| {
            by_amount_then_name((a.amount, a.method.as_str()), (b.amount, b.method.as_str()))
        });

        let report = ReportData {
            sale_count: data.sales.len(),
            total_sales,
            sales_by_product,
            sales_by_seller,
            sales_by_payment_method,
        };
        debug!("Report: {report:?}");
        report
    }

    /// Renders the report as CSV with `section,key,quantity,amount` columns.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = WriterBuilder::new().has_headers(true).from_writer(vec![]);
        self.write_lines(&mut wtr)?;
        let data = wtr
            .into_inner()
            .map_err(|e| PosError::Export(format!("failed to flush CSV: {e}")))?;
        String::from_utf8(data).map_err(|e| PosError::Export(format!("invalid UTF-8: {e}")))
    }

    /// Writes the CSV rendering to `path`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut wtr = WriterBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| PosError::Export(format!("cannot create {}: {e}", path.display())))?;
        self.write_lines(&mut wtr)?;
        wtr.flush()
            .map_err(|e| PosError::Export(format!("cannot write {}: {e}", path.display())))?;
        info!("Report written to {}", path.display());
        Ok(())
    }

    fn write_lines<W: std::io::Write>(&self, wtr: &mut csv::Writer<W>) -> Result<()> {
        let mut lines = vec![CsvLine {
            section: "total",
            key: "all",
            quantity: self.sale_count.to_string(),
            amount: format!("{:.2}", self.total_sales),
        }];
        lines.extend(self.sales_by_product.iter().map(|p| CsvLine {
            section: "product",
            key: &p.name,
            quantity: p.quantity.to_string(),
            amount: format!("{:.2}", p.revenue),
        }));
        lines.extend(self.sales_by_seller.iter().map(|s| CsvLine {
            section: "seller",
            key: &s.seller,
            quantity: s.sale_count.to_string(),
            amount: format!("{:.2}", s.total),
        }));
        lines.extend(self.sales_by_payment_method.iter().map(|m| CsvLine {
            section: "payment_method",
            key: &m.method,
            quantity: String::new(),
            amount: format!("{:.2}", m.amount),
        }));

        for line in &lines {
            wtr.serialize(line)
                .map_err(|e| PosError::Export(format!("failed to write CSV row: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
