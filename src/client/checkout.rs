//! The payment widget boundary and the status shown after a checkout.

use std::future::Future;
use std::time::Duration;

use crate::db::parse_leading_float;

/// Status messages for success and dismissal clear after this long.
pub const SHORT_STATUS: Duration = Duration::from_secs(3);
/// Status messages for widget failures clear after this long.
pub const LONG_STATUS: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    /// Location recorded for every confirmed donation.
    pub default_location: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            merchant_name: "Light For All".to_string(),
            description: "Donation for Diwali Charity".to_string(),
            default_location: "India".to_string(),
        }
    }
}

/// What the donor typed into the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationForm {
    pub name: String,
    pub email: String,
    pub amount: String,
}

impl DonationForm {
    /// The amount's leading number, if it is positive: `"12abc"` gives 12,
    /// the same value the store reads back for that text.
    pub fn parsed_amount(&self) -> Option<f64> {
        parse_leading_float(&self.amount).filter(|a| a.is_finite() && *a > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Amount in the currency's minor unit (paise for INR).
    pub amount_minor: i64,
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    pub prefill_name: String,
    pub prefill_email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Payment authorized; carries the provider's confirmation token.
    Confirmed { payment_id: String },
    /// The donor closed the widget.
    Dismissed,
    /// The widget never loaded.
    Unavailable,
    Failed(String),
}

/// The hosted checkout component. Opaque apart from this call.
pub trait PaymentWidget {
    fn open(&self, request: CheckoutRequest) -> impl Future<Output = CheckoutOutcome> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatus {
    pub kind: StatusKind,
    pub message: String,
    /// `None` means the message stays until the next submission.
    pub clear_after: Option<Duration>,
}

impl PaymentStatus {
    pub fn invalid_form() -> Self {
        Self::error("Please fill in all required fields with valid amounts.", None)
    }

    pub fn from_outcome(outcome: &CheckoutOutcome) -> Self {
        match outcome {
            CheckoutOutcome::Confirmed { .. } => Self {
                kind: StatusKind::Success,
                message: "Payment successful! Thank you for your donation.".to_string(),
                clear_after: Some(SHORT_STATUS),
            },
            CheckoutOutcome::Dismissed => {
                Self::error("Payment cancelled by user.", Some(SHORT_STATUS))
            }
            CheckoutOutcome::Unavailable => Self::error(
                "Payment system not ready. Please refresh the page and try again.",
                Some(LONG_STATUS),
            ),
            CheckoutOutcome::Failed(reason) => {
                Self::error(format!("Payment error: {}", reason), Some(LONG_STATUS))
            }
        }
    }

    fn error(message: impl Into<String>, clear_after: Option<Duration>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
            clear_after,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

impl CheckoutRequest {
    pub fn new(settings: &CheckoutSettings, form: &DonationForm, amount: f64) -> Self {
        Self {
            amount_minor: (amount * 100.0).round() as i64,
            currency: settings.currency.clone(),
            merchant_name: settings.merchant_name.clone(),
            description: settings.description.clone(),
            prefill_name: form.name.clone(),
            prefill_email: form.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_amount_must_be_positive() {
        let mut form = DonationForm {
            name: "Asha".into(),
            email: String::new(),
            amount: "250.50".into(),
        };
        assert_eq!(form.parsed_amount(), Some(250.5));
        form.amount = "0".into();
        assert_eq!(form.parsed_amount(), None);
        form.amount = "-5".into();
        assert_eq!(form.parsed_amount(), None);
        form.amount = "abc".into();
        assert_eq!(form.parsed_amount(), None);
        form.amount = "12abc".into();
        assert_eq!(form.parsed_amount(), Some(12.0));
        form.amount = " 1e3 ".into();
        assert_eq!(form.parsed_amount(), Some(1000.0));
    }

    #[test]
    fn checkout_request_uses_minor_units() {
        let form = DonationForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            amount: "19.99".into(),
        };
        let req = CheckoutRequest::new(&CheckoutSettings::default(), &form, 19.99);
        assert_eq!(req.amount_minor, 1999);
        assert_eq!(req.currency, "INR");
        assert_eq!(req.prefill_email, "asha@example.com");
    }

    #[test]
    fn status_clear_delays() {
        let ok = PaymentStatus::from_outcome(&CheckoutOutcome::Confirmed {
            payment_id: "pay_1".into(),
        });
        assert!(ok.is_success());
        assert_eq!(ok.clear_after, Some(SHORT_STATUS));

        let dismissed = PaymentStatus::from_outcome(&CheckoutOutcome::Dismissed);
        assert_eq!(dismissed.message, "Payment cancelled by user.");
        assert_eq!(dismissed.clear_after, Some(SHORT_STATUS));

        let failed = PaymentStatus::from_outcome(&CheckoutOutcome::Failed("card declined".into()));
        assert_eq!(failed.message, "Payment error: card declined");
        assert_eq!(failed.clear_after, Some(LONG_STATUS));

        assert_eq!(PaymentStatus::invalid_form().clear_after, None);
    }
}
