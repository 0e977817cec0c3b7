//! Client side of the donations API: fetch and save donations, and run a
//! checkout through a [`PaymentWidget`].

use chrono::Utc;

use crate::db::models::{AppendResponse, Donation, ListResponse, NewDonation, Scalar};
use crate::error::{Error, Result};

pub mod checkout;
pub mod leaderboard;

pub use checkout::{
    CheckoutOutcome, CheckoutRequest, CheckoutSettings, DonationForm, PaymentStatus,
    PaymentWidget, StatusKind,
};

pub struct DonationClient {
    http: reqwest::Client,
    base_url: String,
    settings: CheckoutSettings,
    donations: Vec<Donation>,
}

impl DonationClient {
    /// `base_url` is the API root, e.g. `http://localhost:3001/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings: CheckoutSettings::default(),
            donations: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: CheckoutSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Donations from the last successful refresh.
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    fn donations_url(&self) -> String {
        format!("{}/donations", self.base_url)
    }

    pub async fn fetch(&self) -> Result<Vec<Donation>> {
        let body: ListResponse = self
            .http
            .get(self.donations_url())
            .send()
            .await?
            .json()
            .await?;

        if body.success {
            Ok(body.donations.unwrap_or_default())
        } else {
            Err(Error::Api {
                message: body.error.unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }

    /// Reloads the cached list. A failure envelope keeps the old list; a
    /// transport failure clears it.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.fetch().await {
            Ok(donations) => {
                tracing::debug!("Loaded {} donations from API", donations.len());
                self.donations = donations;
                Ok(())
            }
            Err(e @ Error::Api { .. }) => {
                tracing::error!("Failed to load donations: {}", e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("Error loading donations: {}", e);
                self.donations.clear();
                Err(e)
            }
        }
    }

    /// Appends one donation, then reloads the list.
    pub async fn save(&mut self, donation: &NewDonation) -> Result<()> {
        let body: AppendResponse = self
            .http
            .post(self.donations_url())
            .json(donation)
            .send()
            .await?
            .json()
            .await?;

        if !body.success {
            return Err(Error::Api {
                message: body.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        self.refresh().await
    }

    /// Runs one checkout and records the donation when the payment is
    /// confirmed. A failed save is logged; the payment already went through,
    /// so the donor still sees the success status.
    pub async fn donate<W: PaymentWidget>(&mut self, widget: &W, form: &DonationForm) -> PaymentStatus {
        let amount = match form.parsed_amount() {
            Some(amount) if !form.name.is_empty() => amount,
            _ => return PaymentStatus::invalid_form(),
        };

        let request = CheckoutRequest::new(&self.settings, form, amount);
        let outcome = widget.open(request).await;

        match &outcome {
            CheckoutOutcome::Confirmed { payment_id } => {
                tracing::info!("Payment successful: {}", payment_id);
                let donation = self.confirmed_donation(form, amount, payment_id);
                if let Err(e) = self.save(&donation).await {
                    tracing::error!("Error saving donation: {}", e);
                }
            }
            CheckoutOutcome::Dismissed => tracing::info!("Payment modal dismissed"),
            CheckoutOutcome::Unavailable => tracing::warn!("Payment widget not loaded"),
            CheckoutOutcome::Failed(reason) => tracing::error!("Payment error: {}", reason),
        }

        PaymentStatus::from_outcome(&outcome)
    }

    fn confirmed_donation(&self, form: &DonationForm, amount: f64, payment_id: &str) -> NewDonation {
        NewDonation {
            id: Some(Scalar::from(leaderboard::next_id(&self.donations))),
            name: Some(form.name.as_str().into()),
            amount: Some(Scalar::from(amount)),
            date: Some(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
            location: Some(self.settings.default_location.as_str().into()),
            payment_id: Some(payment_id.into()),
            email: Some(form.email.as_str().into()),
        }
    }
}
