//! HTML templates for the web interface.

use crate::listing::{ListEngine, SortField, SortOrder};
use crate::models::{
    categories, Category, Document, DraftFields, SelectedFile, StagedDraft, DOCUMENT_TYPES,
};
use crate::search::SearchState;
use crate::viewer::ViewerController;

/// Base HTML template with the shared navigation header.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - 文書管理</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">文書管理</a>
            <a href="/register">文書登録</a>
            <a href="/search">文書検索</a>
        </nav>
    </header>
    <main>
        <h1>{}</h1>
        {}
    </main>
</body>
</html>"#,
        title, title, content
    )
}

fn alert_box(message: Option<&str>) -> String {
    match message {
        Some(text) => format!(
            r#"<div class="alert">{}</div>"#,
            html_escape(text).replace('\n', "<br>")
        ),
        None => String::new(),
    }
}

fn category_sidebar(engine: &ListEngine) -> String {
    let mut items = String::new();
    for top in categories() {
        let active = engine.state.top_category.as_deref() == Some(top.id);
        let mut link_state = engine.state.clone();
        link_state.select_top(top.id);

        items.push_str(&format!(
            r#"
        <li class="{}">
            <a href="/?{}">{}</a>
            {}
        </li>
        "#,
            if active { "category active" } else { "category" },
            link_state.to_query(),
            html_escape(top.name),
            if active { sub_checkboxes(engine, top) } else { String::new() },
        ));
    }

    format!(
        r#"
    <aside id="sidebar">
        <h2>カテゴリ</h2>
        <ul class="category-tree">
            {}
        </ul>
    </aside>
    "#,
        items
    )
}

fn sub_checkboxes(engine: &ListEngine, top: &Category) -> String {
    let mut items = String::new();
    for sub in top.descendants() {
        let checked = engine.state.checked_subs.iter().any(|id| id == sub.id);
        let mut link_state = engine.state.clone();
        link_state.toggle_sub(sub.id);

        items.push_str(&format!(
            r#"<li><a class="checkbox" href="/?{}">{} {}</a></li>"#,
            link_state.to_query(),
            if checked { "☑" } else { "☐" },
            html_escape(sub.name),
        ));
    }
    format!(r#"<ul class="sub-categories">{}</ul>"#, items)
}

fn sort_header(engine: &ListEngine, field: SortField, label: &str) -> String {
    let mut link_state = engine.state.clone();
    link_state.sort_by(field);
    let marker = match engine.state.sort {
        Some((active, SortOrder::Asc)) if active == field => " ▲",
        Some((active, SortOrder::Desc)) if active == field => " ▼",
        _ => "",
    };
    format!(
        r#"<th><a href="/?{}">{}{}</a></th>"#,
        link_state.to_query(),
        label,
        marker
    )
}

fn pagination(engine: &ListEngine) -> String {
    let total = engine.total_pages();
    if total <= 1 {
        return String::new();
    }

    let mut buttons = String::new();
    let page = engine.state.page;

    if page > 1 {
        let mut prev = engine.state.clone();
        prev.page = page - 1;
        buttons.push_str(&format!(r#"<a href="/?{}">前へ</a>"#, prev.to_query()));
    }
    for number in engine.page_window() {
        if number == page {
            buttons.push_str(&format!(r#"<span class="current">{}</span>"#, number));
        } else {
            let mut link = engine.state.clone();
            link.page = number;
            buttons.push_str(&format!(
                r#"<a href="/?{}">{}</a>"#,
                link.to_query(),
                number
            ));
        }
    }
    if page < total {
        let mut next = engine.state.clone();
        next.page = page + 1;
        buttons.push_str(&format!(r#"<a href="/?{}">次へ</a>"#, next.to_query()));
    }

    format!(r#"<div class="pagination">{}</div>"#, buttons)
}

/// Render the document list page.
pub fn list_page(engine: &ListEngine) -> String {
    let mut rows = String::new();
    for document in engine.page_slice() {
        rows.push_str(&format!(
            r#"
        <tr>
            <td>{}</td>
            <td><a href="/view/{}">{}</a></td>
            <td>{}</td>
            <td>{}</td>
            <td class="row-menu">
                <a href="/register?id={}">編集</a>
                <a href="/documents/{}/delete">削除</a>
            </td>
        </tr>
        "#,
            html_escape(document.display_type()),
            html_escape(&document.id),
            html_escape(document.display_title()),
            html_escape(&document.date),
            html_escape(&document.end_date),
            html_escape(&document.id),
            html_escape(&document.id),
        ));
    }

    let summary = match engine.result_range() {
        Some((first, last)) => format!(
            r#"<p class="summary">全{}件中 {}〜{}件を表示</p>"#,
            engine.total_filtered(),
            first,
            last
        ),
        None => r#"<p class="summary">該当する文書はありません</p>"#.to_string(),
    };

    let mut hidden = String::new();
    if let Some(ref top) = engine.state.top_category {
        hidden.push_str(&format!(
            r#"<input type="hidden" name="top" value="{}">"#,
            html_escape(top)
        ));
    }
    for sub in &engine.state.checked_subs {
        hidden.push_str(&format!(
            r#"<input type="hidden" name="sub" value="{}">"#,
            html_escape(sub)
        ));
    }

    let content = format!(
        r#"
    <div class="list-layout">
        {}
        <section id="document-list">
            <form method="get" action="/" class="title-search">
                {}
                <input type="text" name="title" value="{}" placeholder="タイトルで検索">
                <button type="submit">検索</button>
            </form>
            {}
            <table class="file-listing">
                <thead>
                    <tr>
                        {}
                        {}
                        {}
                        {}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {}
                </tbody>
            </table>
            {}
        </section>
    </div>
    "#,
        category_sidebar(engine),
        hidden,
        html_escape(engine.state.title_filter.as_deref().unwrap_or("")),
        summary,
        sort_header(engine, SortField::Type, "文書種類"),
        sort_header(engine, SortField::Title, "タイトル"),
        sort_header(engine, SortField::Date, "掲示開始日"),
        sort_header(engine, SortField::EndDate, "掲示終了日"),
        rows,
        pagination(engine),
    );

    base_template("文書一覧", &content)
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"
    <div class="form-row">
        <label for="{}">{}</label>
        <input type="text" id="{}" name="{}" value="{}">
    </div>
    "#,
        name,
        label,
        name,
        name,
        html_escape(value)
    )
}

fn date_input(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"
    <div class="form-row">
        <label for="{}">{}</label>
        <input type="date" id="{}" name="{}" value="{}">
    </div>
    "#,
        name,
        label,
        name,
        name,
        html_escape(value)
    )
}

fn type_select(current: &str) -> String {
    let mut options = String::from(r#"<option value="">選択してください</option>"#);
    for doc_type in DOCUMENT_TYPES {
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            doc_type,
            if *doc_type == current { " selected" } else { "" },
            doc_type
        ));
    }
    format!(
        r#"
    <div class="form-row">
        <label for="type">文書種類</label>
        <select id="type" name="type">{}</select>
    </div>
    "#,
        options
    )
}

/// Render the registration form, shared by the create and edit flows.
pub fn register_page(
    fields: &DraftFields,
    selected_file: Option<&str>,
    edit_id: Option<&str>,
    error: Option<&str>,
) -> String {
    let action_query = match edit_id {
        Some(id) => format!("?id={}", html_escape(id)),
        None => String::new(),
    };
    let file_note = match selected_file {
        Some(name) => format!(
            r#"<p class="file-note">選択中: {}</p>"#,
            html_escape(name)
        ),
        None => String::new(),
    };
    let submit_label = if edit_id.is_some() { "更新" } else { "確認画面へ" };

    let content = format!(
        r#"
    {}
    <form method="post" action="/register{}" enctype="multipart/form-data">
        <fieldset>
            <legend>属性情報</legend>
            {}
            {}
            {}
            {}
            {}
            {}
            <div class="form-row">
                <label for="file">PDFファイル</label>
                <input type="file" id="file" name="file" accept="application/pdf">
                {}
            </div>
        </fieldset>
        <fieldset>
            <legend>表示対象</legend>
            {}
            {}
            {}
            {}
            {}
            {}
        </fieldset>
        <div class="form-actions">
            <button type="submit">{}</button>
        </div>
    </form>
    <form method="post" action="/register/cancel{}" class="inline-form">
        <button type="submit" class="secondary">キャンセル</button>
    </form>
    "#,
        alert_box(error),
        action_query,
        type_select(&fields.doc_type),
        text_input("タイトル", "title", &fields.title),
        text_input("発信部門・部", "department", &fields.department),
        text_input("発信部門・課", "division", &fields.division),
        text_input("文書番号", "number", &fields.number),
        text_input("担当者", "personInCharge", &fields.person_in_charge),
        file_note,
        text_input("連絡先（社内）", "internalContact", &fields.internal_contact),
        text_input("連絡先（社外）", "externalContact", &fields.external_contact),
        text_input("メールアドレス", "email", &fields.email),
        text_input("掲示対象", "distributionTarget", &fields.distribution_target),
        date_input("掲示期間（開始）", "date", &fields.date),
        date_input("掲示期間（終了）", "endDate", &fields.end_date),
        submit_label,
        action_query,
    );

    let title = if edit_id.is_some() { "文書編集" } else { "文書登録" };
    base_template(title, &content)
}

fn confirm_row(label: &str, value: &str) -> String {
    let display = if value.is_empty() { "-" } else { value };
    format!(
        r#"<tr><th>{}</th><td>{}</td></tr>"#,
        label,
        html_escape(display)
    )
}

/// Render the read-only confirmation page for a staged draft.
pub fn confirm_page(draft: &StagedDraft, file: Option<&SelectedFile>) -> String {
    let file_size = file
        .map(|f| format!("（{} KB）", f.bytes.len() / 1024))
        .unwrap_or_default();

    let content = format!(
        r#"
    <p>以下の内容で登録します。よろしいですか？</p>
    <table class="confirm-table">
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
        {}
    </table>
    <div class="form-actions">
        <form method="post" action="/confirm" class="inline-form">
            <button type="submit">登録</button>
        </form>
        <form method="post" action="/confirm/back" class="inline-form">
            <button type="submit" class="secondary">戻る</button>
        </form>
    </div>
    "#,
        confirm_row("文書種類", &draft.fields.doc_type),
        confirm_row("タイトル", &draft.fields.title),
        confirm_row("発信部門・部", &draft.fields.department),
        confirm_row("発信部門・課", &draft.fields.division),
        confirm_row("文書番号", &draft.fields.number),
        confirm_row("担当者", &draft.fields.person_in_charge),
        confirm_row("連絡先（社内）", &draft.fields.internal_contact),
        confirm_row("連絡先（社外）", &draft.fields.external_contact),
        confirm_row("メールアドレス", &draft.fields.email),
        confirm_row("掲示対象", &draft.fields.distribution_target),
        confirm_row("掲示期間（開始）", &draft.fields.date),
        confirm_row("掲示期間（終了）", &draft.fields.end_date),
        confirm_row(
            "PDFファイル",
            &format!("{}{}", draft.file_name, file_size)
        ),
    );

    base_template("登録内容の確認", &content)
}

/// Render the terminal completion page.
pub fn complete_page() -> String {
    let content = r#"
    <p>文書の登録が完了しました。</p>
    <p><a href="/">文書一覧へ戻る</a></p>
    "#;
    base_template("登録完了", content)
}

/// Render the viewer page for a fetched document.
pub fn viewer_page(viewer: &ViewerController) -> String {
    let document = &viewer.document;
    let page = viewer.page();
    let zoom = viewer.zoom();

    let preview = match document.download_url {
        Some(ref url) => format!(
            r#"<embed src="{}#page={}&zoom={}" type="application/pdf" class="pdf-frame">"#,
            html_escape(url),
            page,
            zoom
        ),
        None => r#"<p class="file-note">PDFを取得できませんでした</p>"#.to_string(),
    };

    let mut attribute_rows = String::new();
    for (label, value) in viewer.attributes() {
        attribute_rows.push_str(&format!(
            r#"<tr><th>{}</th><td>{}</td></tr>"#,
            label,
            html_escape(&value)
        ));
    }

    let base = format!("/view/{}", html_escape(&document.id));
    let content = format!(
        r#"
    <div class="viewer-toolbar">
        <a href="{base}?page={}&zoom={zoom}">前のページ</a>
        <form method="get" action="{base}" class="inline-form">
            <input type="hidden" name="zoom" value="{zoom}">
            <input type="text" name="page" value="{page}" size="3"> / {total}
            <button type="submit">移動</button>
        </form>
        <a href="{base}?page={}&zoom={zoom}">次のページ</a>
        <span class="spacer"></span>
        <a href="{base}?page={page}&zoom={}">縮小</a>
        <form method="get" action="{base}" class="inline-form">
            <input type="hidden" name="page" value="{page}">
            <input type="text" name="zoom" value="{zoom}" size="3">%
            <button type="submit">適用</button>
        </form>
        <a href="{base}?page={page}&zoom={}">拡大</a>
    </div>
    {}
    <h2>属性情報</h2>
    <table class="confirm-table">
        {}
    </table>
    <div class="form-actions">
        <a href="/register?id={}">編集</a>
        <a href="{base}/delete" class="danger">削除</a>
        <a href="/">一覧へ戻る</a>
    </div>
    "#,
        page.saturating_sub(1),
        page + 1,
        zoom.saturating_sub(10),
        zoom + 10,
        preview,
        attribute_rows,
        html_escape(&document.id),
        base = base,
        page = page,
        zoom = zoom,
        total = viewer.total_pages(),
    );

    base_template(document.display_title(), &content)
}

/// Render the delete confirmation page.
pub fn delete_confirm_page(document: &Document, action: &str, cancel_href: &str) -> String {
    let content = format!(
        r#"
    <p>「{}」を削除します。この操作は取り消せません。</p>
    <div class="form-actions">
        <form method="post" action="{}" class="inline-form">
            <button type="submit" class="danger">削除する</button>
        </form>
        <a href="{}">キャンセル</a>
    </div>
    "#,
        html_escape(document.display_title()),
        html_escape(action),
        html_escape(cancel_href),
    );
    base_template("文書の削除", &content)
}

/// Render the semantic search page in any of its three states.
pub fn search_page(state: &SearchState, error: Option<&str>) -> String {
    let query_value = match state {
        SearchState::NotSearched => "",
        SearchState::NoResults { query } | SearchState::Results { query, .. } => query,
    };

    let results_section = match state {
        SearchState::NotSearched => {
            r#"<p class="search-hint">検索キーワードを入力してください</p>"#.to_string()
        }
        SearchState::NoResults { query } => format!(
            r#"<p class="search-hint">「{}」に一致する文書は見つかりませんでした</p>"#,
            html_escape(query)
        ),
        SearchState::Results { results, .. } => {
            let mut items = String::new();
            for result in results {
                let href = match result.page_number() {
                    Some(page) => format!(
                        "/view/{}?page={}",
                        html_escape(&result.document_id),
                        page
                    ),
                    None => format!("/view/{}", html_escape(&result.document_id)),
                };
                items.push_str(&format!(
                    r#"
                <li class="search-result">
                    <a href="{}">{}</a>
                    <span class="score">関連度 {}%</span>
                    <p class="snippet">{}</p>
                </li>
                "#,
                    href,
                    html_escape(result.display_title()),
                    result.score_percent(),
                    html_escape(&result.content),
                ));
            }
            format!(
                r#"<p class="summary">{}件の結果</p><ul class="search-results">{}</ul>"#,
                results.len(),
                items
            )
        }
    };

    let content = format!(
        r#"
    {}
    <form method="post" action="/search" class="title-search">
        <input type="text" name="query" value="{}" placeholder="文書の内容を検索">
        <button type="submit">検索</button>
    </form>
    {}
    "#,
        alert_box(error),
        html_escape(query_value),
        results_section,
    );

    base_template("文書検索", &content)
}

/// Render a standalone error page.
pub fn error_page(message: &str) -> String {
    let content = format!(
        r#"
    {}
    <p><a href="/">文書一覧へ戻る</a></p>
    "#,
        alert_box(Some(message)),
    );
    base_template("エラー", &content)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// CSS styles for the web interface - minimal text-based design.
pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --border: #ddd;
    --accent: #0a58ca;
    --danger: #b02a37;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: "Hiragino Sans", "Noto Sans JP", sans-serif;
    color: var(--text);
    background: var(--bg);
}

#main-header {
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
}

#main-header nav a {
    margin-right: 1rem;
    text-decoration: none;
    color: var(--accent);
}

#main-header .logo { font-weight: bold; color: var(--text); }

main { padding: 1rem; max-width: 70rem; margin: 0 auto; }

.alert {
    border: 1px solid var(--danger);
    color: var(--danger);
    padding: 0.5rem 1rem;
    margin-bottom: 1rem;
}

.list-layout { display: flex; gap: 2rem; }

#sidebar { min-width: 14rem; }

.category-tree, .sub-categories, .search-results { list-style: none; padding-left: 0; }

.sub-categories { padding-left: 1rem; }

.category-tree a { text-decoration: none; color: var(--text); }

.category.active > a { font-weight: bold; color: var(--accent); }

#document-list { flex: 1; }

.title-search input[type="text"] {
    padding: 0.3rem;
    min-width: 16rem;
}

.file-listing { width: 100%; border-collapse: collapse; margin-top: 0.5rem; }

.file-listing th, .file-listing td {
    border-bottom: 1px solid var(--border);
    text-align: left;
    padding: 0.4rem 0.6rem;
}

.file-listing th a { color: var(--text); text-decoration: none; }

.row-menu a { margin-right: 0.5rem; font-size: 0.9rem; }

.summary { color: var(--text-muted); }

.pagination { margin-top: 1rem; }

.pagination a, .pagination .current {
    display: inline-block;
    padding: 0.2rem 0.6rem;
    margin-right: 0.2rem;
    border: 1px solid var(--border);
    text-decoration: none;
}

.pagination .current { background: var(--accent); color: #fff; }

fieldset { border: 1px solid var(--border); margin-bottom: 1rem; }

.form-row { display: flex; margin: 0.5rem 0; }

.form-row label { min-width: 10rem; }

.form-row input[type="text"], .form-row input[type="date"], .form-row select {
    flex: 1;
    max-width: 24rem;
    padding: 0.3rem;
}

.form-actions { margin-top: 1rem; display: flex; gap: 1rem; align-items: center; }

.inline-form { display: inline; }

button {
    padding: 0.4rem 1.2rem;
    background: var(--accent);
    color: #fff;
    border: none;
    cursor: pointer;
}

button.secondary { background: var(--text-muted); }

button.danger, a.danger { background: var(--danger); color: #fff; }

a.danger { padding: 0.4rem 1.2rem; text-decoration: none; }

.confirm-table th {
    text-align: left;
    min-width: 10rem;
    color: var(--text-muted);
    font-weight: normal;
}

.confirm-table th, .confirm-table td { padding: 0.3rem 0.6rem; }

.viewer-toolbar { display: flex; gap: 0.8rem; align-items: center; margin-bottom: 0.5rem; }

.viewer-toolbar .spacer { flex: 1; }

.pdf-frame { width: 100%; height: 40rem; border: 1px solid var(--border); }

.file-note { color: var(--text-muted); font-size: 0.9rem; }

.search-result { border-bottom: 1px solid var(--border); padding: 0.5rem 0; }

.search-result .score { color: var(--text-muted); margin-left: 0.5rem; }

.search-result .snippet { color: var(--text-muted); margin: 0.2rem 0 0; }

.search-hint { color: var(--text-muted); }
"#;
