use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cart::CartItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Online Payment")]
    OnlinePayment,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::OnlinePayment => "Online Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash on Delivery" => Ok(Self::CashOnDelivery),
            "Online Payment" => Ok(Self::OnlinePayment),
            other => Err(format!("Unknown payment method: {other}")),
        }
    }
}

/// Delivery details collected on the checkout page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFormState {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Name,
    Address,
    Phone,
    PaymentMethod,
}

impl OrderField {
    pub const REQUIRED: [OrderField; 3] = [OrderField::Name, OrderField::Address, OrderField::Phone];
}

impl FromStr for OrderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "address" => Ok(Self::Address),
            "phone" => Ok(Self::Phone),
            "paymentMethod" => Ok(Self::PaymentMethod),
            other => Err(format!("Unknown order field: {other}")),
        }
    }
}

impl OrderFormState {
    /// Applies one input change.
    ///
    /// # Errors
    /// Returns an error if `field` is the payment method and `value` is not one
    /// of the offered options. The form is left untouched in that case.
    pub fn set(&mut self, field: OrderField, value: String) -> Result<(), String> {
        match field {
            OrderField::Name => self.name = value,
            OrderField::Address => self.address = value,
            OrderField::Phone => self.phone = value,
            OrderField::PaymentMethod => self.payment_method = value.parse()?,
        }
        Ok(())
    }

    /// Required fields left empty, in form order.
    pub fn missing_fields(&self) -> Vec<OrderField> {
        OrderField::REQUIRED
            .into_iter()
            .filter(|field| match field {
                OrderField::Name => self.name.is_empty(),
                OrderField::Address => self.address.is_empty(),
                OrderField::Phone => self.phone.is_empty(),
                OrderField::PaymentMethod => false,
            })
            .collect()
    }
}

/// Body sent to the order-placement endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<CartItem>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub total_price: f64,
}

impl OrderPayload {
    pub fn assemble(items: &[CartItem], form: &OrderFormState, total_price: f64) -> Self {
        Self {
            items: items.to_vec(),
            name: form.name.clone(),
            address: form.address.clone(),
            phone: form.phone.clone(),
            payment_method: form.payment_method,
            total_price,
        }
    }
}

/// What the order endpoint hands back once an order is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
}
