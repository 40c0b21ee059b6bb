//! HTML help pages.

use axum::{extract::State, http::HeaderMap, response::Html};
use quick_xml::escape::escape;
use std::sync::Arc;

use super::AppState;
use crate::datetime::format_utc_datetime;

const PAGE_STYLE: &str = r#"
    body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; line-height: 1.6; }
    h1 { color: #333; border-bottom: 1px solid #eee; padding-bottom: 10px; }
    code { background-color: #f5f5f5; padding: 2px 5px; border-radius: 3px; font-family: monospace; }
    .example { background-color: #f9f9f9; padding: 15px; border-radius: 5px; margin: 20px 0; }
    .status { color: #666; font-size: 0.9em; margin-top: 20px; }
    .important { color: #d9534f; font-weight: bold; }
"#;

/// Example thresholds linked from the help page.
const EXAMPLE_THRESHOLDS: [u32; 3] = [100, 200, 500];

/// GET / - Usage page with the last background refresh time.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let site_root = state.site_root(&headers);
    let feed_url = format!("{site_root}/hotentry/all/feed?threshold=200");
    let feed_url = escape(feed_url.as_str()).into_owned();

    let last_update = match state.cache.get().await {
        Some(snapshot) => {
            format_utc_datetime(&snapshot.fetched_at, &state.timezone, "%Y-%m-%d %H:%M:%S")
        }
        None => "更新情報なし".to_string(),
    };

    let examples: String = EXAMPLE_THRESHOLDS
        .iter()
        .map(|t| {
            format!(
                r#"<li><a href="/hotentry/all/feed?threshold={t}" target="_blank">{t}ブックマーク以上の記事</a></li>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>はてなブックマーク ホットエントリー RSS</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>{PAGE_STYLE}</style>
</head>
<body>
    <h1>はてなブックマーク ホットエントリー RSS</h1>
    <p>このサービスは、はてなブックマークのホットエントリーから指定したブックマーク数以上の記事をRSSフィードとして提供します。</p>

    <h2>使い方</h2>
    <p>以下のURLにアクセスすることで、RSSフィードを取得できます：</p>
    <div class="example">
        <code>{feed_url}</code>
    </div>
    <p><code>threshold</code>パラメータに数値を指定することで、そのブックマーク数以上の記事のみをフィルタリングできます。</p>

    <h2>IFTTT用エンドポイント</h2>
    <p>IFTTTのRSSトリガーでも同じURLを利用できます：</p>
    <div class="example">
        <code>{feed_url}</code>
    </div>
    <p><a href="/debug/ifttt">IFTTTデバッグページ</a>でトラブルシューティングができます。</p>

    <h2>例</h2>
    <ul>
            {examples}
    </ul>

    <h2>特徴</h2>
    <ul>
        <li>はてなブックマークの説明文を<code>&lt;description&gt;</code>に含めます</li>
        <li>IFTTTのRSSトリガーに対応したフォーマット</li>
        <li>常に最新のデータを取得（キャッシュなし）</li>
        <li>5分間隔でバックグラウンドデータ更新</li>
    </ul>

    <div class="status">
        <p>最終更新: {last_update}</p>
    </div>
</body>
</html>
"#
    ))
}

/// GET /debug/ifttt - Troubleshooting page for RSS trigger setups.
pub async fn debug_ifttt(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let site_root = state.site_root(&headers);
    let feed_url = format!("{site_root}/hotentry/all/feed?threshold=200");
    let feed_url = escape(feed_url.as_str()).into_owned();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>IFTTT RSSトリガーデバッグ</title>
    <meta charset="utf-8">
    <style>{PAGE_STYLE}</style>
</head>
<body>
    <h1>IFTTT RSSトリガーデバッグ</h1>
    <p>このページは、IFTTTのRSSトリガーで問題が発生した場合のデバッグに使用します。</p>

    <h2>IFTTTでの設定方法</h2>
    <ol>
        <li>IFTTTで「RSS Feed」トリガーを選択</li>
        <li>以下のURLを入力: <code>{feed_url}</code></li>
        <li>「New feed item」を選択</li>
        <li>任意のアクションを設定（例: Lineに通知）</li>
    </ol>

    <h2>トラブルシューティング</h2>
    <ol>
        <li>URLが正しいか確認（特に末尾のスラッシュ）</li>
        <li>しきい値が適切か確認（あまり高いと記事が少なくなる）</li>
        <li>IFTTTの「Check now」ボタンを押して手動で確認</li>
    </ol>

    <h2>RSSフィードの確認方法</h2>
    <p>以下のリンクで直接RSSフィードを確認できます：</p>
    <ul>
        <li><a href="/hotentry/all/feed?threshold=100" target="_blank">100ブックマーク以上</a></li>
        <li><a href="/hotentry/all/feed?threshold=200" target="_blank">200ブックマーク以上</a></li>
    </ul>

    <p class="important">注意: 頻繁に更新されるアイテムを検出するためには、アプレットを一度無効にしてから再度有効にすると良いことがあります。</p>
</body>
</html>
"#
    ))
}
