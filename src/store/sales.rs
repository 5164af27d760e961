//! Sale recording and sales data loading.
//!
//! A sale is written as four separate requests: the sale row, its detail rows,
//! its payment rows and the stock cells of the sold products. Each step is
//! recorded in the [`SaleJournal`](crate::journal::SaleJournal) once it lands,
//! so [`PosStore::resume_sale`] only performs what is still missing.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use log::{debug, error, info, warn};

use crate::auth::Session;
use crate::error::{PosError, Result};
use crate::inventory::compute_stock_updates;
use crate::journal::{JournalEntry, SaleStep};
use crate::models::{
    Customer, EnrichedLineItem, PaymentDetail, Product, Sale, SaleDetail, SalePayload, SaleRecord,
    StockUpdate,
};
use crate::rows::product::MIN_CELLS as PRODUCT_MIN_CELLS;
use crate::rows::reference::CUSTOMER_MIN_CELLS;
use crate::rows::sale::{DETAIL_MIN_CELLS, PAYMENT_MIN_CELLS, SALE_MIN_CELLS};
use crate::rows::{self, ranges};

use super::PosStore;

const UNKNOWN_CUSTOMER: &str = "Cliente Desconocido";
const UNKNOWN_PRODUCT: &str = "Producto Desconocido";
const UNKNOWN_STATUS: &str = "N/A";

/// Largest quantity accepted on one line item.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Outcome of a fully recorded sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub timestamp: String,
    /// Stock cells written by this call. Empty when the stock step had already
    /// been done by an earlier attempt.
    pub stock_updates: Vec<StockUpdate>,
    /// True when some steps were skipped because an earlier attempt did them.
    pub resumed: bool,
}

/// All sales joined with customers and products, plus the raw detail rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesData {
    pub sales: Vec<Sale>,
    pub details: Vec<SaleDetail>,
    pub payments: Vec<PaymentDetail>,
}

fn validate_payload(payload: &SalePayload) -> Result<()> {
    if payload.items.is_empty() {
        return Err(PosError::InvalidSale("sale has no items".to_string()));
    }
    if let Some(item) = payload
        .items
        .iter()
        .find(|i| i.quantity <= 0 || i.quantity > MAX_LINE_QUANTITY)
    {
        return Err(PosError::InvalidSale(format!(
            "quantity for product {} must be between 1 and {MAX_LINE_QUANTITY}, got {}",
            item.product_id, item.quantity
        )));
    }
    if let Some(item) = payload
        .items
        .iter()
        .find(|i| !i.sale_price.is_finite() || i.sale_price < 0.0)
    {
        return Err(PosError::InvalidSale(format!(
            "invalid sale price for product {}",
            item.product_id
        )));
    }
    if let Some(payment) = payload
        .payments
        .iter()
        .find(|p| !p.amount.is_finite() || p.amount < 0.0)
    {
        return Err(PosError::InvalidSale(format!(
            "invalid amount {} for {}",
            payment.amount, payment.method
        )));
    }
    if !payload.total.is_finite() || payload.total < 0.0 {
        return Err(PosError::InvalidSale(format!(
            "invalid total {}",
            payload.total
        )));
    }

    let paid: f64 = payload.payments.iter().map(|p| p.amount).sum();
    if (paid - payload.total).abs() > 0.005 {
        warn!(
            "Payments add up to {paid:.2} but the sale total is {:.2}",
            payload.total
        );
    }
    Ok(())
}

fn enrich_item(detail: &SaleDetail, products: &HashMap<i64, Product>) -> EnrichedLineItem {
    match products.get(&detail.item.product_id) {
        Some(product) => EnrichedLineItem {
            item: detail.item.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            model: product.model.clone().unwrap_or_default(),
            status: product.registration_status.as_str().to_string(),
        },
        None => EnrichedLineItem {
            item: detail.item.clone(),
            name: UNKNOWN_PRODUCT.to_string(),
            description: String::new(),
            brand: String::new(),
            model: String::new(),
            status: UNKNOWN_STATUS.to_string(),
        },
    }
}

fn unknown_customer(id: i64) -> Customer {
    Customer {
        id,
        full_name: UNKNOWN_CUSTOMER.to_string(),
        address: String::new(),
        dni: String::new(),
        phone: String::new(),
    }
}

impl PosStore {
    /// Records a finalized sale and decrements stock.
    ///
    /// If a write fails after at least one step landed, the error is
    /// [`PosError::PartialSale`] and the sale can be finished with
    /// [`resume_sale`](Self::resume_sale).
    pub async fn record_sale(&self, session: &Session, payload: SalePayload) -> Result<SaleReceipt> {
        let _guard = self.begin_submission()?;
        validate_payload(&payload)?;

        let now = Utc::now();
        let sale_id = format!("SALE-{}", self.next_id(now.timestamp_millis() - 1));
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        debug!("Sale payload for {sale_id}: {payload:?}");

        let entry = self.journal.begin(&sale_id, &timestamp, &payload)?;
        info!(
            "Recording sale {sale_id}: {} items, total {:.2}",
            payload.items.len(),
            payload.total
        );
        self.run_sale_steps(session, entry).await
    }

    /// Finishes a journaled sale, skipping the steps already written.
    pub async fn resume_sale(&self, session: &Session, sale_id: &str) -> Result<SaleReceipt> {
        let _guard = self.begin_submission()?;
        let entry = self
            .journal
            .get(sale_id)?
            .ok_or_else(|| PosError::InvalidSale(format!("sale {sale_id} is not journaled")))?;

        if entry.is_complete() {
            info!("Sale {sale_id} is already fully recorded");
            return Ok(SaleReceipt {
                sale_id: entry.sale_id,
                timestamp: entry.timestamp,
                stock_updates: Vec::new(),
                resumed: true,
            });
        }

        info!("Resuming sale {sale_id}, already done: {:?}", entry.completed);
        self.run_sale_steps(session, entry).await
    }

    async fn run_sale_steps(&self, session: &Session, entry: JournalEntry) -> Result<SaleReceipt> {
        let sale_id = entry.sale_id.clone();
        let resumed = !entry.completed.is_empty();

        match self.write_missing_steps(session, &entry).await {
            Ok(stock_updates) => {
                info!("Sale {sale_id} recorded");
                Ok(SaleReceipt {
                    sale_id,
                    timestamp: entry.timestamp,
                    stock_updates,
                    resumed,
                })
            }
            Err(e) => {
                let completed = self
                    .journal
                    .get(&sale_id)
                    .ok()
                    .flatten()
                    .map(|current| current.completed)
                    .unwrap_or_default();
                if completed.is_empty() {
                    error!("Sale {sale_id} failed before any write: {e}");
                    return Err(e);
                }
                error!("Sale {sale_id} partially recorded ({completed:?}): {e}");
                Err(PosError::PartialSale {
                    sale_id,
                    completed,
                    source: Box::new(e),
                })
            }
        }
    }

    async fn write_missing_steps(
        &self,
        session: &Session,
        entry: &JournalEntry,
    ) -> Result<Vec<StockUpdate>> {
        let sale_id = entry.sale_id.as_str();
        let payload = entry.payload.as_ref().ok_or_else(|| {
            PosError::Journal(format!("sale {sale_id} has no payload left to write"))
        })?;

        if !entry.is_done(SaleStep::SaleRow) {
            let record = SaleRecord {
                id: sale_id.to_string(),
                timestamp: entry.timestamp.clone(),
                seller_id: payload.seller_id,
                customer_id: payload.customer_id,
                total: payload.total,
            };
            self.api
                .append_rows(
                    session,
                    ranges::SALES_APPEND,
                    vec![rows::encode_sale_record(&record)],
                )
                .await?;
            self.journal.mark(sale_id, SaleStep::SaleRow)?;
        }

        if !entry.is_done(SaleStep::Details) {
            let detail_rows = payload
                .items
                .iter()
                .map(|item| rows::encode_sale_detail(sale_id, item))
                .collect();
            self.api
                .append_rows(session, ranges::SALE_DETAILS_APPEND, detail_rows)
                .await?;
            self.journal.mark(sale_id, SaleStep::Details)?;
        }

        if !entry.is_done(SaleStep::Payments) {
            if payload.payments.is_empty() {
                debug!("Sale {sale_id} has no payment rows");
            } else {
                let payment_rows = payload
                    .payments
                    .iter()
                    .map(|p| rows::encode_payment_detail(sale_id, p))
                    .collect();
                self.api
                    .append_rows(session, ranges::PAYMENT_DETAILS_APPEND, payment_rows)
                    .await?;
            }
            self.journal.mark(sale_id, SaleStep::Payments)?;
        }

        let mut updates = Vec::new();
        if !entry.is_done(SaleStep::Stock) {
            let snapshot = self.list_products(session).await?;
            updates = compute_stock_updates(&payload.items, &snapshot)?;
            let data = updates
                .iter()
                .map(|u| {
                    (
                        ranges::product_stock_cell(u.row),
                        vec![vec![serde_json::Value::from(u.new_stock)]],
                    )
                })
                .collect();
            self.api.batch_update(session, data).await?;
            self.journal.mark(sale_id, SaleStep::Stock)?;
        }

        Ok(updates)
    }

    /// Loads every sale joined with its customer, line items and payments.
    pub async fn load_sales_data(&self, session: &Session) -> Result<SalesData> {
        let (sale_values, detail_values, payment_values, product_values, customer_values) = tokio::try_join!(
            self.api.get_values(session, ranges::SALES),
            self.api.get_values(session, ranges::SALE_DETAILS),
            self.api.get_values(session, ranges::PAYMENT_DETAILS),
            self.api.get_values(session, ranges::PRODUCTS),
            self.api.get_values(session, ranges::CUSTOMERS),
        )?;

        let records: Vec<SaleRecord> =
            rows::decode_all(&sale_values, SALE_MIN_CELLS, rows::decode_sale_record)
                .into_iter()
                .map(|(_, r)| r)
                .collect();
        let details: Vec<SaleDetail> =
            rows::decode_all(&detail_values, DETAIL_MIN_CELLS, rows::decode_sale_detail)
                .into_iter()
                .map(|(_, d)| d)
                .collect();
        let payments: Vec<PaymentDetail> =
            rows::decode_all(&payment_values, PAYMENT_MIN_CELLS, rows::decode_payment_detail)
                .into_iter()
                .map(|(_, p)| p)
                .collect();

        // First occurrence wins when ids repeat.
        let mut products: HashMap<i64, Product> = HashMap::new();
        for (_, product) in rows::decode_all(&product_values, PRODUCT_MIN_CELLS, rows::decode_product) {
            if let Some(id) = product.id {
                products.entry(id).or_insert(product);
            }
        }
        let mut customers: HashMap<i64, Customer> = HashMap::new();
        for (_, customer) in
            rows::decode_all(&customer_values, CUSTOMER_MIN_CELLS, rows::decode_customer)
        {
            customers.entry(customer.id).or_insert(customer);
        }

        let sales = records
            .into_iter()
            .map(|record| {
                let customer = customers
                    .get(&record.customer_id)
                    .cloned()
                    .unwrap_or_else(|| unknown_customer(record.customer_id));
                let items = details
                    .iter()
                    .filter(|d| d.sale_id == record.id)
                    .map(|d| enrich_item(d, &products))
                    .collect();
                let sale_payments = payments
                    .iter()
                    .filter(|p| p.sale_id == record.id)
                    .map(|p| p.payment.clone())
                    .collect();
                Sale {
                    record,
                    customer,
                    items,
                    payments: sale_payments,
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Loaded {} sales ({} detail rows, {} payment rows)",
            sales.len(),
            details.len(),
            payments.len()
        );
        Ok(SalesData {
            sales,
            details,
            payments,
        })
    }
}
