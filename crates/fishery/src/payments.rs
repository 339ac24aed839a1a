//! Payments and the paid state of the records they cover.
//!
//! A record is paid exactly when a stored payment lists it and the record
//! points back at that payment. Both directions are always written in one
//! transaction.

use chrono::{DateTime, NaiveDate, Utc};
use database::entities::{fishing_records, payments, prelude::*};
use log::{debug, info};
use sea_orm::{
    sea_query::Expr, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub user_id: Option<String>,
    pub fisher_name: Option<String>,
    pub period: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub record_ids: Vec<String>,
    pub payment_rate: Option<f64>,
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub paid_by: Option<String>,
    pub paid_by_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledPayment {
    pub id: String,
    pub reverted_records: u64,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(field, format!("{field} is required")))
}

fn record_ids(ids: Vec<String>) -> Result<Vec<String>> {
    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids.into_iter().map(|id| id.trim().to_string()) {
        if !id.is_empty() && !unique.contains(&id) {
            unique.push(id);
        }
    }

    if unique.is_empty() {
        return Err(Error::validation("recordIds", "recordIds must not be empty"));
    }
    Ok(unique)
}

/// Store a payment and mark every record it covers as paid.
///
/// Fails without writing anything when a record is missing, belongs to
/// another fisher or is already part of a payment.
pub async fn create_payment(
    db: &DatabaseConnection,
    payment: NewPayment,
    now: DateTime<Utc>,
) -> Result<payments::Model> {
    let user_id = required(payment.user_id, "userId")?;
    let period = required(payment.period, "period")?;
    let record_ids = record_ids(payment.record_ids)?;

    let payment_rate = payment.payment_rate.unwrap_or(0.0);
    if !payment_rate.is_finite() || payment_rate < 0.0 {
        return Err(Error::validation(
            "paymentRate",
            "paymentRate must be a non-negative number",
        ));
    }
    if let (Some(start), Some(end)) = (payment.period_start, payment.period_end) {
        if end < start {
            return Err(Error::validation(
                "periodEnd",
                "periodEnd must not be before periodStart",
            ));
        }
    }

    let model = payments::Model {
        id: Uuid::new_v4().to_string(),
        user_id,
        fisher_name: payment.fisher_name,
        period,
        period_start: payment.period_start,
        period_end: payment.period_end,
        record_ids: json!(record_ids),
        payment_rate,
        total_amount: payment_rate * record_ids.len() as f64,
        paid_date: payment.paid_date.unwrap_or(now),
        notes: payment.notes,
        paid_by: payment.paid_by,
        paid_by_name: payment.paid_by_name,
        created_at: now,
    };

    let txn = db.begin().await?;

    for record_id in &record_ids {
        debug!("Marking record {record_id} as paid by {}", model.id);
        let result = FishingRecords::update_many()
            .col_expr(fishing_records::Column::IsPaid, Expr::value(true))
            .col_expr(
                fishing_records::Column::PaymentId,
                Expr::value(model.id.clone()),
            )
            .col_expr(
                fishing_records::Column::PaymentDate,
                Expr::value(model.paid_date),
            )
            .col_expr(
                fishing_records::Column::PaymentAmount,
                Expr::value(payment_rate),
            )
            .col_expr(fishing_records::Column::UpdatedAt, Expr::value(now))
            .filter(fishing_records::Column::Id.eq(record_id.as_str()))
            .filter(fishing_records::Column::UserId.eq(model.user_id.as_str()))
            .filter(fishing_records::Column::IsPaid.eq(false))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let record = FishingRecords::find_by_id(record_id.clone())
                .one(&txn)
                .await?
                .ok_or_else(|| Error::not_found("fishing record", record_id.as_str()))?;

            return Err(if record.user_id.as_deref() != Some(model.user_id.as_str()) {
                Error::validation(
                    "recordIds",
                    format!(
                        "Fishing record `{record_id}` does not belong to `{}`",
                        model.user_id
                    ),
                )
            } else {
                Error::Conflict(format!("Fishing record `{record_id}` is already paid"))
            });
        }
    }

    Payments::insert(payments::ActiveModel {
        id: Set(model.id.clone()),
        user_id: Set(model.user_id.clone()),
        fisher_name: Set(model.fisher_name.clone()),
        period: Set(model.period.clone()),
        period_start: Set(model.period_start),
        period_end: Set(model.period_end),
        record_ids: Set(model.record_ids.clone()),
        payment_rate: Set(model.payment_rate),
        total_amount: Set(model.total_amount),
        paid_date: Set(model.paid_date),
        notes: Set(model.notes.clone()),
        paid_by: Set(model.paid_by.clone()),
        paid_by_name: Set(model.paid_by_name.clone()),
        created_at: Set(model.created_at),
    })
    .exec_without_returning(&txn)
    .await?;

    txn.commit().await?;
    info!(
        "Created payment {} over {} records",
        model.id,
        record_ids.len()
    );

    Ok(model)
}

/// Delete a payment and return every record still linked to it to unpaid.
pub async fn cancel_payment(
    db: &DatabaseConnection,
    id: &str,
    now: DateTime<Utc>,
) -> Result<CancelledPayment> {
    let txn = db.begin().await?;

    debug!("Querying payment {id}");
    let payment = Payments::find_by_id(id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("payment", id))?;

    let reverted = FishingRecords::update_many()
        .col_expr(fishing_records::Column::IsPaid, Expr::value(false))
        .col_expr(
            fishing_records::Column::PaymentId,
            Expr::value(Option::<String>::None),
        )
        .col_expr(
            fishing_records::Column::PaymentDate,
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .col_expr(
            fishing_records::Column::PaymentAmount,
            Expr::value(Option::<f64>::None),
        )
        .col_expr(fishing_records::Column::UpdatedAt, Expr::value(now))
        .filter(fishing_records::Column::Id.is_in(payment.record_ids()))
        .filter(fishing_records::Column::PaymentId.eq(id))
        .exec(&txn)
        .await?;

    Payments::delete_by_id(id.to_string()).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Cancelled payment {id}, reverted {} records",
        reverted.rows_affected
    );

    Ok(CancelledPayment {
        id: id.to_string(),
        reverted_records: reverted.rows_affected,
    })
}

pub async fn get_payment(db: &DatabaseConnection, id: &str) -> Result<payments::Model> {
    debug!("Querying payment {id}");
    Payments::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("payment", id))
}

/// Payments newest first, optionally of one fisher only.
pub async fn list_payments(
    db: &DatabaseConnection,
    user_id: Option<&str>,
) -> Result<Vec<payments::Model>> {
    let mut query = Payments::find().order_by_desc(payments::Column::PaidDate);
    if let Some(user_id) = user_id {
        query = query.filter(payments::Column::UserId.eq(user_id));
    }

    debug!("Querying payments");
    Ok(query.all(db).await?)
}
