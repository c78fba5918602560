//! # Integration Tests
//!
//! End-to-end coverage of the streaming pipeline:
//! decoder -> bounded channel -> dispatch fan-out -> aggregator reads.

#[cfg(test)]
mod e2e_tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use aggregate::{PostcodeAggregator, RecipeAggregator, TimeWindowMatcher};
    use contracts::DeliveryRecord;
    use dispatcher::{Aggregators, DispatchPipeline};
    use ingestion::StreamDecoder;
    use serde_json::json;

    fn aggregators(
        search_terms: &[&str],
        postcode: &str,
        from: &str,
        to: &str,
    ) -> Aggregators {
        Aggregators {
            recipes: Arc::new(RecipeAggregator::new(
                search_terms.iter().map(|s| s.to_string()).collect(),
            )),
            postcodes: Arc::new(PostcodeAggregator::new()),
            time_window: Arc::new(TimeWindowMatcher::new(postcode, from, to).unwrap()),
        }
    }

    fn input(records: &[(&str, &str, &str)]) -> Vec<u8> {
        let items: Vec<serde_json::Value> = records
            .iter()
            .map(|(postcode, recipe, delivery)| {
                json!({ "postcode": postcode, "recipe": recipe, "delivery": delivery })
            })
            .collect();
        serde_json::to_vec(&items).unwrap()
    }

    /// Full pipeline over a small realistic stream.
    #[tokio::test]
    async fn test_e2e_stream_to_report() {
        let bytes = input(&[
            ("10205", "Speedy Steak Fajitas", "Thursday 7AM - 5PM"),
            ("10120", "Cherry Balsamic Pork Chops", "Thursday 11AM - 2PM"),
            ("10120", "Cherry Balsamic Pork Chops", "Saturday 1AM - 8PM"),
            ("10120", "Creamy Dill Chicken", "Wednesday 1PM - 3PM"),
            ("10205", "Speedy Steak Fajitas", "Friday 12PM - 2PM"),
        ]);

        let aggregators = aggregators(&["Steak", "Pork"], "10120", "11AM", "3PM");

        let decoder = StreamDecoder::new(1);
        let (rx, decode_handle) = decoder.spawn(Cursor::new(bytes));
        let dispatch_handle = DispatchPipeline::new(aggregators.clone(), rx).spawn();

        assert_eq!(decode_handle.await.unwrap().unwrap(), 5);
        let stats = dispatch_handle.await.unwrap();
        assert_eq!(stats.records_dispatched, 5);
        assert_eq!(stats.task_faults, 0);

        assert_eq!(aggregators.recipes.unique_count(), 3);
        assert_eq!(
            aggregators
                .recipes
                .counts_by_recipe()
                .iter()
                .map(|c| (c.recipe.as_str(), c.count))
                .collect::<Vec<_>>(),
            vec![
                ("Cherry Balsamic Pork Chops", 2),
                ("Creamy Dill Chicken", 1),
                ("Speedy Steak Fajitas", 2),
            ]
        );
        assert_eq!(
            aggregators.recipes.matched_names(),
            vec!["Cherry Balsamic Pork Chops", "Speedy Steak Fajitas"]
        );

        let busiest = aggregators.postcodes.busiest();
        assert_eq!(busiest.postcode, "10120");
        assert_eq!(busiest.delivery_count, 3);

        // 11AM-2PM fits [11AM, 3PM]; 1PM-3PM fits; 1AM-8PM does not.
        assert_eq!(aggregators.time_window.matched_count(), 2);
    }

    /// A malformed record mid-stream stops decoding but the aggregates for
    /// the records before it survive, and nothing deadlocks.
    #[tokio::test]
    async fn test_e2e_partial_stream_on_decode_error() {
        let mut bytes = input(&[
            ("10120", "Creamy Dill Chicken", "Monday 12PM - 2PM"),
            ("10120", "Tex-Mex Tilapia", "Monday 12PM - 2PM"),
        ]);
        // Corrupt the closing bracket: "]" -> ",{"
        bytes.pop();
        bytes.extend_from_slice(b",{");

        let aggregators = aggregators(&[], "10120", "11AM", "3PM");

        let decoder = StreamDecoder::new(1);
        let (rx, decode_handle) = decoder.spawn(Cursor::new(bytes));
        let dispatch_handle = DispatchPipeline::new(aggregators.clone(), rx).spawn();

        assert!(decode_handle.await.unwrap().is_err());
        let stats = dispatch_handle.await.unwrap();

        assert_eq!(stats.records_dispatched, 2);
        assert_eq!(aggregators.recipes.unique_count(), 2);
        assert_eq!(aggregators.time_window.matched_count(), 2);
    }

    /// Empty container: zero records, clean close, empty report values.
    #[tokio::test]
    async fn test_e2e_empty_stream() {
        let aggregators = aggregators(&["Steak"], "10120", "11AM", "3PM");

        let decoder = StreamDecoder::new(1);
        let (rx, decode_handle) = decoder.spawn(Cursor::new(b"[]".to_vec()));
        let dispatch_handle = DispatchPipeline::new(aggregators.clone(), rx).spawn();

        assert_eq!(decode_handle.await.unwrap().unwrap(), 0);
        assert_eq!(dispatch_handle.await.unwrap().records_dispatched, 0);

        assert_eq!(aggregators.recipes.unique_count(), 0);
        assert!(aggregators.recipes.counts_by_recipe().is_empty());
        assert!(aggregators.recipes.matched_names().is_empty());
        assert_eq!(aggregators.postcodes.busiest().postcode, "");
        assert_eq!(aggregators.postcodes.busiest().delivery_count, 0);
        assert_eq!(aggregators.time_window.matched_count(), 0);
    }

    /// Many records through the capacity-1 channel: no lost updates under
    /// concurrent fan-out, invariant sum(counts) == records processed.
    #[tokio::test]
    async fn test_e2e_no_lost_updates_under_load() {
        let total = 2_000usize;
        let records: Vec<(String, String, String)> = (0..total)
            .map(|i| {
                (
                    format!("10{:03}", i % 5),
                    format!("Recipe {}", i % 17),
                    "Monday 12PM - 2PM".to_string(),
                )
            })
            .collect();
        let refs: Vec<(&str, &str, &str)> = records
            .iter()
            .map(|(p, r, d)| (p.as_str(), r.as_str(), d.as_str()))
            .collect();
        let bytes = input(&refs);

        let aggregators = aggregators(&[], "10000", "11AM", "3PM");

        let decoder = StreamDecoder::new(1);
        let (rx, decode_handle) = decoder.spawn(Cursor::new(bytes));
        let dispatch_handle = DispatchPipeline::new(aggregators.clone(), rx).spawn();

        assert_eq!(decode_handle.await.unwrap().unwrap() as usize, total);
        let stats = dispatch_handle.await.unwrap();
        assert_eq!(stats.records_dispatched as usize, total);

        let recipe_sum: u32 = aggregators
            .recipes
            .counts_by_recipe()
            .iter()
            .map(|c| c.count)
            .sum();
        assert_eq!(recipe_sum as usize, total);

        assert_eq!(aggregators.recipes.unique_count(), 17);
        // 2000 records over 5 postcodes round-robin
        assert_eq!(aggregators.postcodes.busiest().delivery_count, 400);
        // every "10000" record sits inside the window
        assert_eq!(aggregators.time_window.matched_count(), 400);
    }

    /// Records decoded from JSON deserialize into the shared contract type.
    #[test]
    fn test_contract_record_shape() {
        let record: DeliveryRecord = serde_json::from_value(json!({
            "postcode": "10120",
            "recipe": "Hearty Pork Chili",
            "delivery": "Monday 9AM - 4PM",
        }))
        .unwrap();
        assert_eq!(record.recipe, "Hearty Pork Chili");
    }
}
