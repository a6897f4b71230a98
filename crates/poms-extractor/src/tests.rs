//! End-to-end tests for query routing and extraction

#[cfg(test)]
mod tests {
    use crate::{Extractor, ExtractorConfig, ExtractorError, QueryRouter};
    use chrono::NaiveDate;
    use poms_domain::{Extraction, Intent, OrderAction};
    use poms_llm::MockProvider;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn create_router(llm: MockProvider) -> QueryRouter<MockProvider> {
        let extractor = Extractor::new(llm, ExtractorConfig::default())
            .unwrap()
            .with_reference_date(reference_date())
            .with_model_name("mock");
        QueryRouter::new(extractor)
    }

    #[tokio::test]
    async fn test_order_query_flow() {
        let mut llm = MockProvider::default();
        llm.add_response(
            "Buy 250 AAPL in account capers",
            r#"{"orders": [{"action": "buy", "ticker": "aapl", "quantity": 250, "weight": null, "accounts": ["capers"]}]}"#,
        );
        let router = create_router(llm.clone());

        let result = router.route("Buy 250 AAPL in account capers").await.unwrap();

        match result {
            Some(Extraction::Orders(orders)) => {
                assert_eq!(orders.orders.len(), 1);
                let order = &orders.orders[0];
                assert_eq!(order.action, Some(OrderAction::Buy));
                assert_eq!(order.ticker.as_deref(), Some("aapl"));
                assert_eq!(order.quantity, Some(250));
                assert_eq!(order.weight, None);
                assert_eq!(order.accounts, Some(vec!["capers".to_string()]));
            }
            other => panic!("expected orders, got {:?}", other),
        }
        assert_eq!(llm.call_count(), 1);

        // The few-shot turns precede the query
        let conversation = llm.last_conversation().unwrap();
        assert_eq!(conversation.len(), 2 + 3 * 5);
    }

    #[tokio::test]
    async fn test_holding_query_resolves_today() {
        let mut llm = MockProvider::default();
        llm.add_response(
            "What are my holdings in account ABC as of today",
            r#"{"holdings": [{"ticker": null, "accounts": ["ABC"], "start_date": null, "end_date": null, "fields": ["weight", "price", "mv", "yield"]}]}"#,
        );
        let router = create_router(llm);

        let result = router
            .route("What are my holdings in account ABC as of today")
            .await
            .unwrap();

        match result {
            Some(Extraction::Holdings(holdings)) => {
                let holding = &holdings.holdings[0];
                assert_eq!(holding.start_date.as_deref(), Some("2024-05-06"));
                assert_eq!(holding.end_date, None);
                assert_eq!(holding.accounts, Some(vec!["ABC".to_string()]));
            }
            other => panic!("expected holdings, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_performance_query_resolves_ytd() {
        let mut llm = MockProvider::default();
        llm.add_response(
            "Show performance of all accounts YTD",
            r#"{"performances": [{"accounts": null, "start_date": "YTD", "end_date": null}]}"#,
        );
        let router = create_router(llm);

        let result = router.route("Show performance of all accounts YTD").await.unwrap();

        match result {
            Some(Extraction::Performances(performances)) => {
                let performance = &performances.performances[0];
                assert_eq!(performance.start_date.as_deref(), Some("2024-01-01"));
                assert_eq!(performance.end_date.as_deref(), Some("2024-05-05"));
                assert_eq!(performance.accounts, None);
            }
            other => panic!("expected performances, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unrecognized_query_returns_none() {
        let llm = MockProvider::new(r#"{"orders": []}"#);
        let router = create_router(llm.clone());

        let result = router.route("What's the weather like?").await.unwrap();

        assert!(result.is_none());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_order_keywords_take_priority() {
        let llm = MockProvider::new(r#"{"orders": []}"#);
        let router = create_router(llm);

        let text = "Sell my position and show performance";
        assert_eq!(router.classify(text), Intent::Order);

        let result = router.route(text).await.unwrap();
        assert!(matches!(result, Some(Extraction::Orders(_))));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let router = create_router(MockProvider::failing());

        let result = router.route("Buy 10 MSFT").await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_no_tool_call_returns_none() {
        let llm = MockProvider::no_call();
        let router = create_router(llm.clone());

        let result = router.route("Show my positions").await.unwrap();
        assert!(result.is_none());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_an_error() {
        let router = create_router(MockProvider::new("The model rambled instead"));

        let result = router.route("What are my returns").await;
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_result_serializes_as_collection() {
        let mut llm = MockProvider::default();
        llm.add_response(
            "Sell 500 TSLA in accounts capers, ushy and halifax",
            r#"{"orders": [{"action": "sell", "ticker": "tsla", "quantity": 500, "accounts": ["capers", "ushy", "halifax"]}]}"#,
        );
        let router = create_router(llm);

        let extraction = router
            .route("Sell 500 TSLA in accounts capers, ushy and halifax")
            .await
            .unwrap()
            .unwrap();

        let json = serde_json::to_string(&extraction).unwrap();
        let back: Extraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, extraction);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["orders"][0]["action"], "sell");
        assert_eq!(value["orders"][0]["accounts"][2], "halifax");
    }
}
