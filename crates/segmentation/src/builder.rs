//! Attributes builder — fluent API for assembling a validated customer record.

use segment_core::{CustomerAttributes, SegmentError, SegmentResult};

#[derive(Debug, Default, Clone)]
pub struct AttributesBuilder {
    age: Option<f64>,
    income: Option<f64>,
    total_spending: Option<f64>,
    recency: Option<f64>,
    customer_since: Option<f64>,
    num_web_purchases: Option<f64>,
    num_store_purchases: Option<f64>,
    num_web_visits_month: Option<f64>,
}

impl AttributesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age(mut self, years: f64) -> Self {
        self.age = Some(years);
        self
    }

    pub fn income(mut self, income: f64) -> Self {
        self.income = Some(income);
        self
    }

    pub fn total_spending(mut self, amount: f64) -> Self {
        self.total_spending = Some(amount);
        self
    }

    pub fn recency(mut self, days: f64) -> Self {
        self.recency = Some(days);
        self
    }

    pub fn customer_since(mut self, days: f64) -> Self {
        self.customer_since = Some(days);
        self
    }

    pub fn web_purchases(mut self, count: f64) -> Self {
        self.num_web_purchases = Some(count);
        self
    }

    pub fn store_purchases(mut self, count: f64) -> Self {
        self.num_store_purchases = Some(count);
        self
    }

    pub fn web_visits_per_month(mut self, count: f64) -> Self {
        self.num_web_visits_month = Some(count);
        self
    }

    pub fn build(self) -> SegmentResult<CustomerAttributes> {
        let attrs = CustomerAttributes {
            age: required("age", self.age)?,
            income: required("income", self.income)?,
            total_spending: required("totalSpending", self.total_spending)?,
            recency: required("recency", self.recency)?,
            customer_since: required("customerSince", self.customer_since)?,
            num_web_purchases: required("numWebPurchases", self.num_web_purchases)?,
            num_store_purchases: required("numStorePurchases", self.num_store_purchases)?,
            num_web_visits_month: required("numWebVisitsMonth", self.num_web_visits_month)?,
        };
        attrs.validate()?;
        Ok(attrs)
    }
}

fn required(field: &'static str, value: Option<f64>) -> SegmentResult<f64> {
    value.ok_or_else(|| SegmentError::validation(field, "is required"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> AttributesBuilder {
        AttributesBuilder::new()
            .age(40.0)
            .income(30_000.0)
            .total_spending(500.0)
            .recency(50.0)
            .customer_since(1000.0)
            .web_purchases(2.0)
            .store_purchases(3.0)
            .web_visits_per_month(5.0)
    }

    #[test]
    fn test_build_complete() {
        let attrs = complete().build().unwrap();
        assert_eq!(attrs.income, 30_000.0);
        assert_eq!(attrs.num_web_visits_month, 5.0);
    }

    #[test]
    fn test_missing_field() {
        let builder = AttributesBuilder::new().age(40.0).income(30_000.0);
        match builder.build() {
            Err(SegmentError::Validation { field, .. }) => assert_eq!(field, "totalSpending"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_infinite_value_rejected() {
        let result = complete().total_spending(f64::INFINITY).build();
        assert!(matches!(
            result,
            Err(SegmentError::Validation { field: "totalSpending", .. })
        ));
    }
}
