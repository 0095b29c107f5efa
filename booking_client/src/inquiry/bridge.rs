use crate::api::BookingApi;

use super::store::InquiryTokenStore;

/// Claim pending anonymous inquiries for the now-authenticated account.
///
/// Silent background reconciliation: nothing here is user-facing and no
/// failure propagates. The token set is only cleared when the backend
/// reports a positive associated count; on zero or on any failure the
/// tokens stay put for the next login. An empty set makes no network call.
///
/// Returns the associated count when the backend answered, `None` when the
/// run was skipped or failed.
pub(crate) async fn associate_anonymous_inquiries(
    api: &dyn BookingApi,
    store: &InquiryTokenStore,
    access_token: &str,
) -> Option<u64> {
    let tokens = match store.all().await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!("Skipping inquiry association, token set unreadable: {e}");
            return None;
        }
    };

    if tokens.is_empty() {
        return None;
    }

    match api.associate_inquiries(access_token, &tokens).await {
        Ok(count) if count > 0 => {
            if let Err(e) = store.clear().await {
                tracing::warn!("Associated {count} inquiries but failed to clear tokens: {e}");
            } else {
                tracing::info!("Associated {count} anonymous inquiries with the account");
            }
            Some(count)
        }
        Ok(count) => {
            tracing::debug!("Backend associated no inquiries, keeping tokens for retry");
            Some(count)
        }
        Err(e) => {
            tracing::debug!("Inquiry association skipped: {e}");
            None
        }
    }
}
