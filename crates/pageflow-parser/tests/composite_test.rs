//! Integration tests for CompositeParser.

mod common;

use std::sync::{Arc, Mutex};

use common::{Behavior, TestProducer, kinds};
use pageflow_page::ProducerRef;
use pageflow_parser::{
  CompositeParser, DependencyAwareParser, PageParser, ParseError, ParseProgress,
};
use pageflow_resolver::DependencyResolver;
use tokio_util::sync::CancellationToken;

fn source(producers: Vec<ProducerRef>) -> Arc<dyn PageParser> {
  Arc::new(DependencyAwareParser::new(producers, DependencyResolver::new()))
}

fn composite() -> CompositeParser {
  CompositeParser::new(vec![
    source(vec![
      TestProducer::new("B").after(&["A"]).into_ref(),
      TestProducer::new("A").into_ref(),
    ]),
    source(vec![TestProducer::new("X").into_ref()]),
  ])
}

#[test]
fn test_parse_concatenates_in_parser_order() {
  let pages = composite().parse().unwrap();

  assert_eq!(kinds(&pages), ["A", "B", "X"]);
}

#[tokio::test]
async fn test_parse_async_concatenates_in_parser_order() {
  let pages = composite()
    .parse_async(&CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(kinds(&pages), ["A", "B", "X"]);
}

#[tokio::test]
async fn test_parse_async_single_and_empty() {
  let single = CompositeParser::new(vec![source(vec![TestProducer::new("A").into_ref()])]);
  let empty = CompositeParser::new(Vec::new());
  let cancel = CancellationToken::new();

  assert_eq!(kinds(&single.parse_async(&cancel).await.unwrap()), ["A"]);
  assert!(empty.parse_async(&cancel).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_parse_with_progress_reports_each_parser() {
  let events = Mutex::new(Vec::new());
  let sink = |progress: ParseProgress| events.lock().unwrap().push(progress);

  let pages = composite()
    .parse_with_progress(&sink, &CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(pages.len(), 3);
  let events = events.into_inner().unwrap();
  let messages: Vec<&str> = events.iter().map(|event| event.message.as_str()).collect();
  assert_eq!(
    messages,
    [
      "Composite: parsed [dependency-aware] (1/2)",
      "Composite: parsed [dependency-aware] (2/2)",
    ]
  );
  assert_eq!(events[1].progress, 1.0);
}

#[tokio::test]
async fn test_cancelled_before_start() {
  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = composite().parse_async(&cancel).await.unwrap_err();

  assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_failure_propagates() {
  let parser = CompositeParser::new(vec![
    source(vec![TestProducer::new("A").into_ref()]),
    source(vec![
      TestProducer::new("Y").with(Behavior::Fail("broken source")).into_ref(),
    ]),
  ]);

  let err = parser
    .parse_async(&CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(err, ParseError::Producer { .. }));
  assert!(parser.parse().is_err());
  assert_eq!(parser.parsers().len(), 2);
}
