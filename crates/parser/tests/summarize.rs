use abstractor_fetch::{MockFetcher, MockResponse};
use abstractor_parser::Abstractor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const FICHUB: &str = "https://fichub.test/api";
const WORK_FETCH: &str = "https://archiveofourown.org/works/22222?view_adult=true";
const SERIES_FETCH: &str = "https://archiveofourown.org/series/2468";
const FFN_QUERY: &str = "https://fichub.test/api?q=https://www.fanfiction.net/s/5782108";

fn fetcher() -> Arc<MockFetcher> {
    Arc::new(MockFetcher::with_pages([
        (WORK_FETCH, include_str!("../../extract/fixtures/ao3_work.html")),
        (SERIES_FETCH, include_str!("../../extract/fixtures/ao3_series.html")),
        (FFN_QUERY, include_str!("../../extract/fixtures/fichub_ffn.json")),
    ]))
}

fn abstractor(fetcher: Arc<MockFetcher>) -> Abstractor {
    Abstractor::new(fetcher, FICHUB)
}

#[tokio::test]
async fn duplicate_links_are_summarized_once() {
    let fetcher = fetcher();
    let text = "Have you read https://archiveofourown.org/works/22222 yet? \
                It's the sequel to https://www.fanfiction.net/s/5782108/1/ \
                (and yes, https://www.archiveofourown.org/works/22222/chapters/5 is the good bit)";
    let summaries = abstractor(fetcher.clone()).summarize(text, &CancellationToken::new()).await;
    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].starts_with("**The Long Way Home** (<https://archiveofourown.org/works/22222>)"));
    assert!(summaries[1].starts_with("**Harry Potter and the Methods of Rationality**"));
    assert_eq!(fetcher.hits(WORK_FETCH).await, 1);
    assert_eq!(fetcher.total_hits().await, 2);
}

#[tokio::test]
async fn work_summary_from_fixture() {
    let summaries = abstractor(fetcher())
        .summarize("https://archiveofourown.org/works/22222", &CancellationToken::new())
        .await;
    let summary = &summaries[0];
    assert!(summary.contains("\n**Part 2** of the **Homeward** series (<https://archiveofourown.org/series/2468>)\n"));
    assert!(summary.contains("\n**Relationships:** Hermione Granger/Ron Weasley, Harry Potter & Ginny Weasley\n"));
    assert!(summary.contains("\n**Additional Characters:** Luna Lovegood, Neville Longbottom\n"));
    assert!(summary.ends_with("**Words:** 45678 **Chapters:** 12/? **Kudos:** 1234 **Updated:** 2023-01-15"));
}

#[tokio::test]
async fn adjacent_and_masked_links() {
    let fetcher = fetcher();
    let text = "https://archiveofourown.org/works/22222,https://www.fanfiction.net/s/5782108 \
                and [https://archiveofourown.org/works/22222](https://archiveofourown.org/works/22222)";
    let summaries = abstractor(fetcher.clone()).summarize(text, &CancellationToken::new()).await;
    assert_eq!(summaries.len(), 2);
    assert!(summaries[0].starts_with("**The Long Way Home**"));
    assert!(summaries[1].starts_with("**Harry Potter and the Methods of Rationality**"));
    assert_eq!(fetcher.hits(WORK_FETCH).await, 1);
}

#[tokio::test]
async fn summaries_are_capped() {
    let fetcher = fetcher();
    let text = "https://archiveofourown.org/works/22222 https://archiveofourown.org/series/2468 \
                https://m.fanfiction.net/s/5782108";
    let summaries = abstractor(fetcher.clone())
        .with_max_links(2)
        .summarize(text, &CancellationToken::new())
        .await;
    assert_eq!(summaries.len(), 2);
    assert!(summaries[1].starts_with(":lock:**Homeward**"));
    assert_eq!(fetcher.hits(FFN_QUERY).await, 0);
}

#[tokio::test]
async fn failed_and_repeated_links_do_not_count_towards_the_cap() {
    let fetcher = fetcher();
    let text = "https://archiveofourown.org/works/404 https://archiveofourown.org/works/22222 \
                https://archiveofourown.org/works/22222/chapters/9 https://www.fanfiction.net/s/5782108 \
                https://archiveofourown.org/series/2468";
    let summaries = abstractor(fetcher.clone())
        .with_max_links(2)
        .summarize(text, &CancellationToken::new())
        .await;
    assert_eq!(summaries.len(), 2);
    assert!(summaries[1].contains("fanfiction.net/s/5782108"));
    assert_eq!(fetcher.hits(SERIES_FETCH).await, 0);
    assert_eq!(fetcher.total_hits().await, 3);
}

#[tokio::test]
async fn escaped_and_unsupported_links_are_not_fetched() {
    let fetcher = fetcher();
    let text = "!https://archiveofourown.org/works/22222 and https://example.com/works/1 \
                and https://archiveofourown.org/users/writer";
    let summaries = abstractor(fetcher.clone()).summarize(text, &CancellationToken::new()).await;
    assert!(summaries.is_empty());
    assert_eq!(fetcher.total_hits().await, 0);
}

#[tokio::test]
async fn custom_prefix() {
    let fetcher = fetcher();
    let summaries = abstractor(fetcher.clone())
        .with_prefix("~")
        .summarize("~https://archiveofourown.org/works/22222 !https://www.fanfiction.net/s/5782108", &CancellationToken::new())
        .await;
    assert_eq!(summaries.len(), 1);
    assert_eq!(fetcher.hits(WORK_FETCH).await, 0);
}

#[tokio::test]
async fn failing_links_are_skipped() {
    let fetcher = Arc::new(
        MockFetcher::with_pages([(FFN_QUERY, include_str!("../../extract/fixtures/fichub_ffn.json"))])
            .with_response(WORK_FETCH, MockResponse::Timeout)
            .with_response(SERIES_FETCH, MockResponse::AuthRequired),
    );
    let text = "https://archiveofourown.org/works/22222 https://archiveofourown.org/series/2468 \
                https://archiveofourown.org/works/404 https://www.fanfiction.net/s/5782108";
    let summaries = abstractor(fetcher).summarize(text, &CancellationToken::new()).await;
    assert_eq!(summaries.len(), 1);
    assert!(summaries[0].contains("fanfiction.net/s/5782108"));
}

#[tokio::test]
async fn cancelled_message_yields_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let fetcher = fetcher();
    let summaries = abstractor(fetcher.clone())
        .summarize("https://archiveofourown.org/works/22222", &cancel)
        .await;
    assert!(summaries.is_empty());
    assert_eq!(fetcher.total_hits().await, 0);
}

#[tokio::test]
async fn reaction_selects_a_series_member() {
    let fetcher = fetcher();
    let abstractor = abstractor(fetcher.clone());
    let cancel = CancellationToken::new();
    let series = abstractor.summarize("https://archiveofourown.org/series/2468", &cancel).await.remove(0);
    assert!(series.contains("\n2. __The Long Way Home__: <https://archiveofourown.org/works/22222>\n"));

    let member = abstractor.react(&series, "2️⃣", &cancel).await.unwrap().unwrap();
    assert!(member.starts_with("**The Long Way Home**"));
    assert_eq!(fetcher.hits(WORK_FETCH).await, 1);

    assert_eq!(abstractor.react(&series, "🔟", &cancel).await.unwrap(), None);
    assert_eq!(abstractor.react(&series, "👍", &cancel).await.unwrap(), None);
    assert_eq!(abstractor.react(&member, "1", &cancel).await.unwrap(), None);
}

#[tokio::test]
async fn reaction_failures_propagate() {
    let fetcher = Arc::new(MockFetcher::with_pages([(
        SERIES_FETCH,
        include_str!("../../extract/fixtures/ao3_series.html"),
    )]));
    let series = "**Homeward** (<https://archiveofourown.org/series/2468>) by **writer**";
    let err = abstractor(fetcher).react(series, "1", &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(&*err, abstractor_parser::error::ErrorKind::FetchFailure(_)));
}
