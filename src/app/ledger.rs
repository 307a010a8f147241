//! Transactions shown by the dashboard
//!
//! The ledger is seeded with sample data. Refunds go through a simulated
//! payment processor that declines accounts flagged with `declines_refunds`.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use color_eyre::eyre::{bail, WrapErr};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type TxId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Contribution,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Completed,
    Refunded,
    Rejected { reason: String },
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Rejected { reason } => write!(f, "rejected ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

impl TxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Completed => "completed",
            TxStatus::Refunded => "refunded",
            TxStatus::Rejected { .. } => "rejected",
        }
    }
}

/// What the current user may do with a transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub can_refund: bool,
    pub can_reject: bool,
    pub can_download_invoice: bool,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TxId,
    pub created_at: DateTime<Utc>,
    pub description: String,
    /// Contributor or payee
    pub account: String,
    pub amount_cents: i64,
    pub kind: TxKind,
    pub status: TxStatus,
    /// Related transactions share a group
    pub group: Option<String>,
    /// Backed by an expense (has an invoice rather than a receipt)
    pub has_expense: bool,
    pub permissions: Permissions,
    /// The simulated processor refuses refunds for this account
    pub declines_refunds: bool,
}

impl Transaction {
    pub fn is_refunded(&self) -> bool {
        self.status == TxStatus::Refunded
    }

    pub fn amount_label(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let cents = self.amount_cents.unsigned_abs();
        format!("{sign}${}.{:02}", cents / 100, cents % 100)
    }

    /// Plain-text receipt or invoice
    pub fn receipt(&self) -> String {
        let title = if self.has_expense { "INVOICE" } else { "RECEIPT" };
        format!(
            "{title} #{}\n\nDate:     {}\nAccount:  {}\nFor:      {}\nAmount:   {}\nStatus:   {}\n",
            self.id,
            self.created_at.format("%Y-%m-%d %H:%M UTC"),
            self.account,
            self.description,
            self.amount_label(),
            self.status,
        )
    }
}

/// Transactions plus the active group filter
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    group_filter: Option<String>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            group_filter: None,
        }
    }

    /// Sample data relative to `now`
    pub fn seed(now: DateTime<Utc>) -> Self {
        let full = Permissions {
            can_refund: true,
            can_reject: true,
            can_download_invoice: true,
        };
        let tx = |id: TxId,
                  hours_ago: i64,
                  description: &str,
                  account: &str,
                  amount_cents: i64,
                  kind: TxKind,
                  group: Option<&str>| Transaction {
            id,
            created_at: now - ChronoDuration::hours(hours_ago),
            description: description.to_string(),
            account: account.to_string(),
            amount_cents,
            kind,
            status: TxStatus::Completed,
            group: group.map(str::to_string),
            has_expense: kind == TxKind::Expense,
            permissions: full,
            declines_refunds: false,
        };

        let mut transactions = vec![
            tx(1041, 2, "Monthly contribution", "Ada Byron", 2500, TxKind::Contribution, Some("g-ada")),
            tx(1040, 5, "Server hosting, March", "Hetzner", -4900, TxKind::Expense, Some("g-hosting")),
            tx(1039, 9, "One-time donation", "Grace Hopper", 10000, TxKind::Contribution, None),
            tx(1038, 26, "Monthly contribution", "Ada Byron", 2500, TxKind::Contribution, Some("g-ada")),
            tx(1037, 30, "Sticker print run", "PrintCo", -12000, TxKind::Expense, None),
            tx(1036, 49, "Event sponsorship", "Initech", 50000, TxKind::Contribution, Some("g-initech")),
            tx(1035, 73, "Server hosting, February", "Hetzner", -4900, TxKind::Expense, Some("g-hosting")),
            tx(1034, 98, "Recurring backer", "Blocked Bank Ltd", 1500, TxKind::Contribution, None),
        ];

        for t in &mut transactions {
            match t.kind {
                // Expenses are paid out, not refunded
                TxKind::Expense => t.permissions.can_refund = false,
                TxKind::Contribution => t.permissions.can_reject = t.amount_cents < 20_000,
            }
        }
        if let Some(t) = transactions.iter_mut().find(|t| t.id == 1034) {
            t.declines_refunds = true;
        }
        if let Some(t) = transactions.iter_mut().find(|t| t.id == 1037) {
            t.permissions.can_download_invoice = false;
        }

        Self::new(transactions)
    }

    /// Transactions passing the group filter, newest first
    pub fn visible(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| match &self.group_filter {
                Some(group) => t.group.as_ref() == Some(group),
                None => true,
            })
            .collect()
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TxId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn group_filter(&self) -> Option<&str> {
        self.group_filter.as_deref()
    }

    pub fn set_group_filter(&mut self, group: impl Into<String>) {
        self.group_filter = Some(group.into());
    }

    /// Returns true if a filter was active
    pub fn clear_filter(&mut self) -> bool {
        self.group_filter.take().is_some()
    }

    /// Returns false for unknown ids
    pub fn mark_refunded(&mut self, id: TxId) -> bool {
        let Some(t) = self.transactions.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        t.status = TxStatus::Refunded;
        true
    }

    /// Returns false for unknown ids
    pub fn mark_rejected(&mut self, id: TxId, reason: impl Into<String>, refunded: bool) -> bool {
        let Some(t) = self.transactions.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        t.status = TxStatus::Rejected {
            reason: reason.into(),
        };
        t.permissions.can_reject = false;
        if refunded {
            t.permissions.can_refund = false;
        }
        true
    }
}

/// What the payment processor needs to refund a transaction
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub id: TxId,
    pub account: String,
    pub declines: bool,
    pub latency: Duration,
}

impl RefundRequest {
    pub fn for_transaction(tx: &Transaction, latency: Duration) -> Self {
        Self {
            id: tx.id,
            account: tx.account.clone(),
            declines: tx.declines_refunds,
            latency,
        }
    }
}

/// Simulated payment processor call
pub async fn process_refund(request: RefundRequest) -> color_eyre::Result<()> {
    tracing::info!(tx = request.id, account = %request.account, "Submitting refund");
    tokio::time::sleep(request.latency).await;

    if request.declines {
        bail!("Refund declined by {}'s bank", request.account);
    }
    Ok(())
}

/// Write the receipt for `tx` into `dir`, returning the file path
pub fn save_receipt(tx: &Transaction, dir: &Path) -> color_eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    let kind = if tx.has_expense { "invoice" } else { "receipt" };
    let path = dir.join(format!("{kind}-{}.txt", tx.id));
    std::fs::write(&path, tx.receipt())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::seed(Utc::now())
    }

    #[test]
    fn test_amount_label() {
        let mut tx = ledger().get(1041).unwrap().clone();
        assert_eq!(tx.amount_label(), "$25.00");
        tx.amount_cents = -4905;
        assert_eq!(tx.amount_label(), "-$49.05");
    }

    #[test]
    fn test_group_filter() {
        let mut ledger = ledger();
        let total = ledger.visible().len();

        ledger.set_group_filter("g-ada");
        let ids: Vec<TxId> = ledger.visible().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1041, 1038]);

        assert!(ledger.clear_filter());
        assert!(!ledger.clear_filter());
        assert_eq!(ledger.visible().len(), total);
    }

    #[test]
    fn test_status_changes() {
        let mut ledger = ledger();
        assert!(ledger.mark_refunded(1041));
        assert!(ledger.get(1041).unwrap().is_refunded());

        assert!(ledger.mark_rejected(1039, "Duplicate", true));
        let tx = ledger.get(1039).unwrap();
        assert_eq!(
            tx.status,
            TxStatus::Rejected {
                reason: "Duplicate".to_string()
            }
        );
        assert!(!tx.permissions.can_reject);
        assert!(!tx.permissions.can_refund);
        assert!(tx.receipt().contains("rejected (Duplicate)"));

        assert!(!ledger.mark_refunded(1));
    }

    #[tokio::test]
    async fn test_refund_declined_for_flagged_account() {
        let ledger = ledger();
        let ok = RefundRequest::for_transaction(ledger.get(1041).unwrap(), Duration::ZERO);
        assert!(process_refund(ok).await.is_ok());

        let declined = RefundRequest::for_transaction(ledger.get(1034).unwrap(), Duration::ZERO);
        let err = process_refund(declined).await.unwrap_err();
        assert_eq!(err.to_string(), "Refund declined by Blocked Bank Ltd's bank");
    }

    #[test]
    fn test_save_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger();

        let path = save_receipt(ledger.get(1040).unwrap(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "invoice-1040.txt");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("INVOICE #1040"));
        assert!(content.contains("Hetzner"));
    }
}
