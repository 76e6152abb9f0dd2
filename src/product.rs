//! Defines the product transaction record and its database table.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::database_id::TransactionId;

/// A product listing and whether it sold, as published by the transaction feed.
///
/// Field names follow the feed, so the same type is used to parse the feed and
/// to serialize transactions in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTransaction {
    /// The ID of the transaction, taken from the feed.
    pub id: TransactionId,
    /// The product name.
    pub title: String,
    /// A longer description of the product.
    pub description: String,
    /// The listed price, never negative.
    pub price: f64,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// A URL for the product image.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold or listed. Only the month is used for reports.
    #[serde(rename = "dateOfSale", with = "date_of_sale")]
    pub date_of_sale: Date,
}

impl ProductTransaction {
    /// Create a new transaction with an empty description and image.
    ///
    /// Shortcut for building records in tests and tools.
    pub fn build(
        id: TransactionId,
        price: f64,
        category: &str,
        sold: bool,
        date_of_sale: Date,
    ) -> Self {
        Self {
            id,
            title: format!("Product #{id}"),
            description: String::new(),
            price,
            category: category.to_owned(),
            image: String::new(),
            sold,
            date_of_sale,
        }
    }

    /// Set the title of the transaction.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// (De)serializes the sale date.
///
/// The feed uses RFC 3339 timestamps such as "2021-11-27T20:29:54+05:30". The
/// calendar date is taken as written, without converting to UTC, so a sale is
/// reported in the month the seller saw. Plain "YYYY-MM-DD" dates are also
/// accepted, which is how dates are written back out.
mod date_of_sale {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use time::{
        Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
        macros::format_description,
    };

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(date)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid dateOfSale {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<Date> {
        let raw = raw.trim();

        OffsetDateTime::parse(raw, &Rfc3339)
            .map(|date_time| date_time.date())
            .or_else(|_| {
                PrimitiveDateTime::parse(
                    raw,
                    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
                )
                .map(|date_time| date_time.date())
            })
            .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")))
            .ok()
    }
}

/// Create the product transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_product_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_transaction (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_product_transaction_date_sold
            ON product_transaction(date_of_sale, sold);",
        (),
    )?;

    Ok(())
}

/// The columns selected by [map_product_transaction_row], in order.
pub const PRODUCT_TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, image, sold, date_of_sale";

/// Map a database row to a [ProductTransaction].
///
/// The row must contain [PRODUCT_TRANSACTION_COLUMNS] in order.
pub fn map_product_transaction_row(row: &Row) -> Result<ProductTransaction, rusqlite::Error> {
    Ok(ProductTransaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{ProductTransaction, date_of_sale};

    #[test]
    fn parses_feed_record() {
        let record = json!({
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        });

        let transaction: ProductTransaction = serde_json::from_value(record).unwrap();

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.price, 329.85);
        assert_eq!(transaction.category, "men's clothing");
        assert!(!transaction.sold);
        assert_eq!(transaction.date_of_sale, date!(2021 - 11 - 27));
    }

    #[test]
    fn keeps_calendar_date_as_written() {
        // 00:10 at +05:30 is still the previous day in UTC.
        assert_eq!(
            date_of_sale::parse("2022-01-01T00:10:00+05:30"),
            Some(date!(2022 - 01 - 01))
        );
    }

    #[test]
    fn accepts_plain_dates_and_naive_timestamps() {
        assert_eq!(
            date_of_sale::parse("2022-03-15"),
            Some(date!(2022 - 03 - 15))
        );
        assert_eq!(
            date_of_sale::parse("2022-03-15T10:00:00"),
            Some(date!(2022 - 03 - 15))
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(date_of_sale::parse("yesterday"), None);
        assert_eq!(date_of_sale::parse("2022-13-01"), None);
    }

    #[test]
    fn rejects_non_boolean_sold() {
        let record = json!({
            "id": 1,
            "title": "",
            "price": 1.0,
            "description": "",
            "category": "",
            "image": "",
            "sold": "yes",
            "dateOfSale": "2022-03-15"
        });

        assert!(serde_json::from_value::<ProductTransaction>(record).is_err());
    }

    #[test]
    fn serializes_with_feed_field_names() {
        let transaction =
            ProductTransaction::build(7, 12.5, "jewelery", true, date!(2022 - 03 - 15));

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["dateOfSale"], "2022-03-15");
        assert_eq!(json["sold"], true);
        assert_eq!(json["category"], "jewelery");
        assert!(json.get("date_of_sale").is_none());
    }
}
