#[cfg(test)]
mod tests {
    use crate::support::{MockSubmitter, failed_info, pending_info, sample_tx, success_info};
    use client::chain::ChainClient;
    use client::http::HttpClient;
    use model::error::ApiError;
    use model::network::Network;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tokio::sync::mpsc;
    use wallet::error::WalletError;
    use wallet::info::WalletInfo;
    use wallet::metadata_cache::TokenMetadataCache;
    use wallet::tracker::{TrackerState, TransactionTracker};

    #[test]
    fn rejected_submission_is_failed_with_its_error() {
        let tracker = TransactionTracker::failed(ApiError::Logical("incorrect recipient".into()));
        assert_eq!(tracker.state(), TrackerState::Failed);
        assert_eq!(
            tracker.last_error(),
            Some(ApiError::Logical("incorrect recipient".into()))
        );
    }

    #[test]
    fn prepared_but_unsent_is_unknown() {
        let submitter = MockSubmitter::new(Vec::new(), Vec::new());
        let tracker = TransactionTracker::prepared(submitter, sample_tx(180, 0));
        assert_eq!(tracker.state(), TrackerState::Unknown);
        assert_eq!(tracker.last_error(), None);
        assert_eq!(tracker.txid(), None);
    }

    #[test]
    fn state_follows_the_stored_snapshot() {
        let submitter = MockSubmitter::new(Vec::new(), Vec::new());

        let pending = TransactionTracker::with_result(
            submitter.clone(),
            None,
            Ok(pending_info("aa11")),
        );
        assert_eq!(pending.state(), TrackerState::Pending);

        let unanchored = TransactionTracker::with_result(
            submitter.clone(),
            None,
            Ok(success_info("aa11", false)),
        );
        assert_eq!(unanchored.state(), TrackerState::PreConfirmed);

        let anchored = TransactionTracker::with_result(
            submitter.clone(),
            None,
            Ok(success_info("aa11", true)),
        );
        assert_eq!(anchored.state(), TrackerState::Confirmed);

        let aborted =
            TransactionTracker::with_result(submitter, None, Ok(failed_info("aa11")));
        assert_eq!(aborted.state(), TrackerState::Failed);
        assert_eq!(
            aborted.last_error(),
            Some(ApiError::Logical("abort_by_response".into()))
        );
    }

    #[tokio::test]
    async fn send_submits_and_moves_to_pending() {
        let submitter = MockSubmitter::new(vec![Ok(pending_info("bb22"))], Vec::new());
        let mut tracker = TransactionTracker::prepared(submitter.clone(), sample_tx(180, 3));

        tracker.send(None).await.unwrap();

        assert_eq!(tracker.state(), TrackerState::Pending);
        assert_eq!(tracker.txid(), Some("bb22"));
        assert_eq!(submitter.submitted.load(Ordering::SeqCst), 1);
        assert_eq!(submitter.last_fee.load(Ordering::SeqCst), 180);
    }

    #[tokio::test]
    async fn send_applies_the_fee_override_before_submitting() {
        let submitter = MockSubmitter::new(vec![Ok(pending_info("cc33"))], Vec::new());
        let mut tracker = TransactionTracker::prepared(submitter.clone(), sample_tx(180, 3));

        tracker.send(Some(400)).await.unwrap();

        assert_eq!(submitter.last_fee.load(Ordering::SeqCst), 400);
        assert_eq!(tracker.state(), TrackerState::Pending);
    }

    #[tokio::test]
    async fn failed_send_stores_the_error() {
        let submitter = MockSubmitter::new(
            vec![Err(ApiError::Logical("ConflictingNonceInMempool".into()))],
            Vec::new(),
        );
        let mut tracker = TransactionTracker::prepared(submitter, sample_tx(180, 3));

        let err = tracker.send(None).await.unwrap_err();
        assert!(matches!(err, WalletError::Api(ApiError::Logical(_))));
        assert_eq!(tracker.state(), TrackerState::Failed);
        assert_eq!(
            tracker.last_error(),
            Some(ApiError::Logical("ConflictingNonceInMempool".into()))
        );
    }

    #[tokio::test]
    async fn resend_after_failure_recovers() {
        let submitter = MockSubmitter::new(
            vec![
                Err(ApiError::Logical("FeeTooLow".into())),
                Ok(pending_info("dd44")),
            ],
            Vec::new(),
        );
        let mut tracker = TransactionTracker::prepared(submitter.clone(), sample_tx(100, 3));

        assert!(tracker.send(None).await.is_err());
        assert_eq!(tracker.state(), TrackerState::Failed);

        // A higher fee clears the failure on the next attempt.
        tracker.send(Some(300)).await.unwrap();
        assert_eq!(tracker.state(), TrackerState::Pending);
        assert_eq!(tracker.last_error(), None);
        assert_eq!(submitter.last_fee.load(Ordering::SeqCst), 300);
        assert_eq!(submitter.submitted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn send_is_illegal_once_accepted() {
        for anchored in [false, true] {
            let submitter = MockSubmitter::new(Vec::new(), Vec::new());
            let mut tracker = TransactionTracker::with_result(
                submitter.clone(),
                Some(sample_tx(180, 3)),
                Ok(success_info("ee55", anchored)),
            );
            let before = tracker.state();

            let err = tracker.send(Some(999)).await.unwrap_err();
            assert!(matches!(err, WalletError::InvalidState));

            // Nothing reached the submitter and the snapshot is untouched.
            assert_eq!(submitter.submitted.load(Ordering::SeqCst), 0);
            assert_eq!(tracker.state(), before);
            assert_eq!(tracker.txid(), Some("ee55"));
        }
    }

    #[tokio::test]
    async fn refresh_advances_pending_to_confirmed() {
        let submitter = MockSubmitter::new(
            vec![Ok(pending_info("ff66"))],
            vec![
                Ok(success_info("ff66", false)),
                Ok(success_info("ff66", true)),
            ],
        );
        let mut tracker = TransactionTracker::prepared(submitter, sample_tx(180, 3));
        tracker.send(None).await.unwrap();

        assert_eq!(tracker.refresh().await.unwrap(), TrackerState::PreConfirmed);
        assert_eq!(tracker.refresh().await.unwrap(), TrackerState::Confirmed);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let submitter = MockSubmitter::new(
            vec![Ok(pending_info("9977"))],
            vec![Err(ApiError::Network("timed out".into()))],
        );
        let mut tracker = TransactionTracker::prepared(submitter, sample_tx(180, 3));
        tracker.send(None).await.unwrap();

        let err = tracker.refresh().await.unwrap_err();
        assert!(matches!(err, WalletError::Api(ApiError::Network(_))));
        assert_eq!(tracker.state(), TrackerState::Pending);
        assert_eq!(tracker.txid(), Some("9977"));
    }

    #[tokio::test]
    async fn confirmation_through_the_wallet_notifies_balance_observers() {
        let chain = Arc::new(ChainClient::new(
            &Network::Testnet,
            Arc::new(HttpClient::new()),
        ));
        let metadata = Arc::new(TokenMetadataCache::new(chain.clone()));
        let wallet = WalletInfo::new(
            chain,
            metadata,
            "SP3K8BC0PPEVCV7NZ6QSRWPQ2JE9E5B6N3PA0KBR9".to_string(),
        )
        .unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        wallet.observers().subscribe(tx).await;

        let submitter = MockSubmitter::new(
            vec![Ok(pending_info("ab88"))],
            vec![
                Ok(pending_info("ab88")),
                Ok(success_info("ab88", true)),
                Ok(success_info("ab88", true)),
            ],
        );
        let mut tracker = TransactionTracker::prepared(submitter, sample_tx(180, 3));
        tracker.send(None).await.unwrap();

        // Still pending: no event yet.
        assert_eq!(
            wallet.refresh_tracker(&mut tracker).await.unwrap(),
            TrackerState::Pending
        );
        assert!(rx.try_recv().is_err());

        // Confirmation fires exactly one balance change for this address.
        assert_eq!(
            wallet.refresh_tracker(&mut tracker).await.unwrap(),
            TrackerState::Confirmed
        );
        let change = rx.recv().await.unwrap();
        assert_eq!(change.address, wallet.address());
        assert!(change.token_id.is_empty());

        // A refresh that stays confirmed does not notify again.
        assert_eq!(
            wallet.refresh_tracker(&mut tracker).await.unwrap(),
            TrackerState::Confirmed
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_without_a_submission_is_rejected() {
        let submitter = MockSubmitter::new(Vec::new(), Vec::new());
        let mut tracker = TransactionTracker::prepared(submitter, sample_tx(180, 3));

        let err = tracker.refresh().await.unwrap_err();
        assert!(matches!(err, WalletError::NothingToSubmit));
        assert_eq!(tracker.state(), TrackerState::Unknown);
    }
}
