//! WordPress eXtended RSS (WXR 1.2) serialization

use std::fmt;

/// Author credited for every exported post
pub const EXPORT_AUTHOR: &str = "admin";

/// Channel-level fields of the export document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    /// RFC 2822 timestamp of the export
    pub pub_date: String,
}

/// One exported post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportItem {
    pub post_id: String,
    pub title: String,
    /// Original URL of the post on the source platform
    pub link: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    pub category: String,
    /// Rendered HTML body with absolute image URLs
    pub content: String,
}

/// Escapes text for XML element content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps text in CDATA, splitting any `]]>` that would end the section early
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Category slug used as the `nicename` attribute
pub fn category_nicename(category: &str) -> String {
    category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// A channel and its items, serialized as WXR through `Display`
#[derive(Debug, Clone, Copy)]
pub struct WxrDocument<'a> {
    pub channel: &'a Channel,
    pub items: &'a [ExportItem],
}

impl fmt::Display for WxrDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, self.channel)?;
        for item in self.items {
            write_item(f, item)?;
        }
        f.write_str("\n</channel>\n</rss>\n")
    }
}

/// Renders a complete WXR document
pub fn render_document(channel: &Channel, items: &[ExportItem]) -> String {
    WxrDocument { channel, items }.to_string()
}

fn write_header(f: &mut fmt::Formatter<'_>, channel: &Channel) -> fmt::Result {
    let link = escape_xml(&channel.link);
    f.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n")?;
    f.write_str("<rss version=\"2.0\"\n")?;
    f.write_str("\txmlns:excerpt=\"http://wordpress.org/export/1.2/excerpt/\"\n")?;
    f.write_str("\txmlns:content=\"http://purl.org/rss/1.0/modules/content/\"\n")?;
    f.write_str("\txmlns:wfw=\"http://wellformedweb.org/CommentAPI/\"\n")?;
    f.write_str("\txmlns:dc=\"http://purl.org/dc/elements/1.1/\"\n")?;
    f.write_str("\txmlns:wp=\"http://wordpress.org/export/1.2/\"\n")?;
    f.write_str(">\n<channel>\n")?;

    writeln!(f, "\t<title>{}</title>", escape_xml(&channel.title))?;
    writeln!(f, "\t<link>{}</link>", link)?;
    writeln!(f, "\t<description>{}</description>", escape_xml(&channel.description))?;
    writeln!(f, "\t<pubDate>{}</pubDate>", escape_xml(&channel.pub_date))?;
    f.write_str("\t<language>ko-KR</language>\n")?;
    f.write_str("\t<wp:wxr_version>1.2</wp:wxr_version>\n")?;
    writeln!(f, "\t<wp:base_site_url>{}</wp:base_site_url>", link)?;
    writeln!(f, "\t<wp:base_blog_url>{}</wp:base_blog_url>", link)?;
    writeln!(
        f,
        "\t<wp:author><wp:author_id>1</wp:author_id><wp:author_login>{author}</wp:author_login>\
         <wp:author_email>{author}@example.com</wp:author_email>\
         <wp:author_display_name>{display}</wp:author_display_name>\
         <wp:author_first_name>{empty}</wp:author_first_name>\
         <wp:author_last_name>{empty}</wp:author_last_name></wp:author>",
        author = EXPORT_AUTHOR,
        display = cdata(EXPORT_AUTHOR),
        empty = cdata(""),
    )
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &ExportItem) -> fmt::Result {
    let link = escape_xml(&item.link);
    f.write_str("\n\t<item>\n")?;

    writeln!(f, "\t\t<title>{}</title>", escape_xml(&item.title))?;
    writeln!(f, "\t\t<link>{}</link>", link)?;
    writeln!(f, "\t\t<pubDate>{}</pubDate>", item.date)?;
    writeln!(f, "\t\t<dc:creator>{}</dc:creator>", cdata(EXPORT_AUTHOR))?;
    writeln!(f, "\t\t<guid isPermaLink=\"false\">{}</guid>", link)?;
    f.write_str("\t\t<description></description>\n")?;
    writeln!(f, "\t\t<content:encoded>{}</content:encoded>", cdata(&item.content))?;
    writeln!(f, "\t\t<excerpt:encoded>{}</excerpt:encoded>", cdata(""))?;
    writeln!(f, "\t\t<wp:post_id>{}</wp:post_id>", escape_xml(&item.post_id))?;
    writeln!(f, "\t\t<wp:post_date>{}</wp:post_date>", item.date)?;
    writeln!(f, "\t\t<wp:post_date_gmt>{}</wp:post_date_gmt>", item.date)?;
    f.write_str("\t\t<wp:comment_status>open</wp:comment_status>\n")?;
    f.write_str("\t\t<wp:ping_status>open</wp:ping_status>\n")?;
    writeln!(f, "\t\t<wp:post_name>post-{}</wp:post_name>", escape_xml(&item.post_id))?;
    f.write_str("\t\t<wp:status>publish</wp:status>\n")?;
    f.write_str("\t\t<wp:post_parent>0</wp:post_parent>\n")?;
    f.write_str("\t\t<wp:menu_order>0</wp:menu_order>\n")?;
    f.write_str("\t\t<wp:post_type>post</wp:post_type>\n")?;
    f.write_str("\t\t<wp:post_password></wp:post_password>\n")?;
    f.write_str("\t\t<wp:is_sticky>0</wp:is_sticky>\n")?;
    writeln!(
        f,
        "\t\t<category domain=\"category\" nicename=\"{}\">{}</category>",
        escape_xml(&category_nicename(&item.category)),
        cdata(&item.category)
    )?;
    f.write_str("\t</item>\n")
}
