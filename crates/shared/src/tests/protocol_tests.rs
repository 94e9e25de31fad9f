use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn default_filter_sends_only_page_and_limit() {
    let query = ListQuery::from_filter(&FilterState::default(), 1, DEFAULT_PAGE_SIZE);

    assert_eq!(
        serde_json::to_value(&query).expect("serialize"),
        serde_json::json!({ "page": 1, "limit": 20 })
    );
}

#[test]
fn status_all_and_blank_search_are_omitted() {
    let filter = FilterState {
        status: StatusFilter::only("all"),
        search_query: "   ".into(),
        ..FilterState::default()
    };
    let query = ListQuery::from_filter(&filter, 2, 20);

    assert_eq!(query.status, None);
    assert_eq!(query.search, None);
    assert_eq!(query.page, 2);
}

#[test]
fn period_and_date_are_sent_together() {
    let filter = FilterState {
        status: StatusFilter::only("pending"),
        search_query: " asha ".into(),
        time_period: TimePeriod::Weekly,
        selected_date: Some(date(2024, 5, 17)),
    };
    let query = ListQuery::from_filter(&filter, 1, 20);

    assert_eq!(
        serde_json::to_value(&query).expect("serialize"),
        serde_json::json!({
            "status": "pending",
            "search": "asha",
            "page": 1,
            "limit": 20,
            "period": "weekly",
            "date": "2024-05-17"
        })
    );
}

#[test]
fn period_without_date_is_omitted() {
    let filter = FilterState {
        time_period: TimePeriod::Daily,
        ..FilterState::default()
    };
    let query = ListQuery::from_filter(&filter, 1, 20);
    assert_eq!(query.period, None);
    assert_eq!(query.date, None);
}

#[test]
fn overall_period_never_sends_a_date() {
    let filter = FilterState {
        time_period: TimePeriod::Overall,
        selected_date: Some(date(2024, 1, 1)),
        ..FilterState::default()
    };
    assert_eq!(filter.period_window(), None);
}

#[test]
fn patch_only_touches_set_fields() {
    let mut filter = FilterState {
        status: StatusFilter::only("pending"),
        search_query: "coins".into(),
        time_period: TimePeriod::Monthly,
        selected_date: Some(date(2024, 2, 1)),
    };

    filter.apply(FilterPatch::default().search("refund"));
    assert_eq!(filter.status, StatusFilter::only("pending"));
    assert_eq!(filter.search_query, "refund");
    assert_eq!(filter.selected_date, Some(date(2024, 2, 1)));

    filter.apply(FilterPatch::default().status("all").date(None));
    assert_eq!(filter.status, StatusFilter::All);
    assert_eq!(filter.selected_date, None);
    assert_eq!(filter.time_period, TimePeriod::Monthly);
}

#[test]
fn time_period_parses_case_insensitively() {
    assert_eq!("Weekly".parse::<TimePeriod>(), Ok(TimePeriod::Weekly));
    assert!("yearly".parse::<TimePeriod>().is_err());
}

#[test]
fn operations_route_to_method_action_and_body() {
    let reply = ItemOperation::Reply {
        reply: " Thanks, fixed. ".into(),
    };
    assert_eq!(reply.method(), MutationMethod::Post);
    assert_eq!(reply.action(), Some("reply"));
    assert_eq!(
        reply.body(),
        Some(serde_json::json!({ "reply": "Thanks, fixed." }))
    );

    let reject = ItemOperation::Reject {
        rejection_reason: "missing documents".into(),
    };
    assert_eq!(reject.method(), MutationMethod::Patch);
    assert_eq!(
        reject.body(),
        Some(serde_json::json!({ "rejectionReason": "missing documents" }))
    );

    assert_eq!(ItemOperation::Delete.method(), MutationMethod::Delete);
    assert_eq!(ItemOperation::Delete.action(), None);
    assert_eq!(ItemOperation::Approve.body(), None);
}

#[test]
fn blank_operation_payloads_fail_validation() {
    assert_eq!(
        ItemOperation::Reply { reply: " ".into() }.validate(),
        Err(ValidationError::EmptyReply)
    );
    assert_eq!(
        ItemOperation::Reject {
            rejection_reason: String::new()
        }
        .validate(),
        Err(ValidationError::EmptyRejectionReason)
    );
    assert_eq!(
        ItemOperation::SetStatus { status: "".into() }.validate(),
        Err(ValidationError::EmptyStatus)
    );
    assert!(ItemOperation::Resolve.validate().is_ok());
}
