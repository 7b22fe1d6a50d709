mod support;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use support::{
    RecordingFetcher, UnreachableRepo, body_text, get, header, router, router_with, site,
};

#[tokio::test]
async fn listing_shows_only_active_jobs() {
    let app = router(site());

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-type").starts_with("text/html"));
    assert!(!header(&response, "x-request-id").is_empty());

    let body = body_text(response).await;
    assert!(body.contains("Senior Rust Engineer"));
    assert!(body.contains("Product Designer"));
    assert!(!body.contains("Archived Accountant"));
    assert!(body.contains(r#"href="/jobs/rec1""#));
}

#[tokio::test]
async fn listing_applies_search_and_filters() {
    let app = router(site());

    let body = body_text(get(&app, "/jobs?q=rust").await).await;
    assert!(body.contains("Senior Rust Engineer"));
    assert!(!body.contains("Product Designer"));

    let body = body_text(get(&app, "/jobs?types=Part-time").await).await;
    assert!(body.contains("Product Designer"));
    assert!(!body.contains("Senior Rust Engineer"));
}

#[tokio::test]
async fn listing_reports_unavailable_data_source() {
    let app = router_with(
        site(),
        Arc::new(UnreachableRepo),
        Arc::new(RecordingFetcher::default()),
    );

    let response = get(&app, "/jobs").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_text(response).await;
    assert!(body.contains("Temporarily Unavailable"));
}

#[tokio::test]
async fn job_detail_renders_structured_data() {
    let app = router(site());

    let response = get(&app, "/jobs/rec1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    assert!(body.contains("<title>Senior Rust Engineer at Acme Corp | Bordful</title>"));
    assert!(body.contains(r#"<meta property="og:type" content="article">"#));
    assert!(body.contains("http://localhost:3000/api/og/jobs/rec1"));
    assert!(body.contains(r#"<link rel="canonical" href="http://localhost:3000/jobs/rec1">"#));
    assert!(body.contains("application/ld+json"));
    assert!(body.contains(r#""@type":"JobPosting""#));
    assert!(body.contains(r#""@type":"BreadcrumbList""#));
    assert!(body.contains("<strong>fast</strong>"));
    assert!(body.contains("https://acme.example/apply"));
}

#[tokio::test]
async fn missing_and_inactive_jobs_are_not_found() {
    let app = router(site());

    for uri in ["/jobs/missing", "/jobs/rec3"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains("Page Not Found"), "{uri}");
    }
}

#[tokio::test]
async fn marketing_pages_render_markdown() {
    let app = router(site());

    let response = get(&app, "/faq").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<title>FAQ | Bordful</title>"));
    assert!(body.contains("How do I apply?"));
    assert!(body.contains("<h2"));

    let response = get(&app, "/careers-at-mars").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn marketing_pages_carry_page_structured_data() {
    let app = router(site());

    let body = body_text(get(&app, "/faq").await).await;
    assert!(body.contains(r#""@type":"FAQPage""#));
    assert!(body.contains(r#""name":"How do I apply?""#));
    assert!(body.contains(r#""@type":"BreadcrumbList""#));

    let body = body_text(get(&app, "/about").await).await;
    assert!(body.contains(r#""@type":"AboutPage""#));

    let body = body_text(get(&app, "/contact").await).await;
    assert!(body.contains(r#""@type":"ContactPage""#));

    for uri in ["/pricing", "/changelog"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains(r#""@type":"BreadcrumbList""#), "{uri}");
        assert!(!body.contains(r#""@type":"AboutPage""#), "{uri}");
    }
}

#[tokio::test]
async fn feeds_use_their_content_types() {
    let app = router(site());

    let cases = [
        ("/feed.xml", "application/rss+xml; charset=utf-8"),
        ("/atom.xml", "application/atom+xml; charset=utf-8"),
        ("/feed.json", "application/feed+json; charset=utf-8"),
    ];
    for (uri, content_type) in cases {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(header(&response, "content-type"), content_type);
        let body = body_text(response).await;
        assert!(body.contains("Senior Rust Engineer"), "{uri}");
        assert!(!body.contains("Archived Accountant"), "{uri}");
    }
}

#[tokio::test]
async fn json_feed_lists_newest_job_first() {
    let app = router(site());

    let body = body_text(get(&app, "/feed.json").await).await;
    let feed: Value = serde_json::from_str(&body).expect("feed is valid json");

    assert_eq!(feed["version"], "https://jsonfeed.org/version/1.1");
    let items = feed["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["url"], "http://localhost:3000/jobs/rec1");
}

#[tokio::test]
async fn disabled_feeds_are_not_found_and_not_advertised() {
    let mut site = site();
    site.feeds.rss = false;
    site.feeds.json = false;
    let app = router(site);

    let response = get(&app, "/feed.xml").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "RSS feed not enabled");

    let response = get(&app, "/feed.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "JSON feed not enabled");

    let response = get(&app, "/atom.xml").await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(get(&app, "/jobs").await).await;
    assert!(!page.contains("http://localhost:3000/feed.xml"));
    assert!(page.contains("http://localhost:3000/atom.xml"));
}

#[tokio::test]
async fn sitemap_lists_pages_and_active_jobs() {
    let app = router(site());

    let response = get(&app, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type"),
        "application/xml; charset=utf-8"
    );
    let body = body_text(response).await;
    assert!(body.contains("<loc>http://localhost:3000/</loc>"));
    assert!(body.contains("<loc>http://localhost:3000/about</loc>"));
    assert!(body.contains("<loc>http://localhost:3000/jobs/rec1</loc>"));
    assert!(!body.contains("rec3"));
}

#[tokio::test]
async fn robots_points_at_sitemap() {
    let app = router(site());

    let response = get(&app, "/robots.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "text/plain; charset=utf-8");
    insta::assert_snapshot!(body_text(response).await, @r"
    User-agent: *
    Allow: /

    Sitemap: http://localhost:3000/sitemap.xml
    ");
}

#[tokio::test]
async fn health_and_static_assets() {
    let app = router(site());

    let response = get(&app, "/_health").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, "/static/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "content-type").starts_with("text/css"));
    assert!(!header(&response, "etag").is_empty());
}
