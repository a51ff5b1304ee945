use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fetcher::EVENT_TIME_FORMAT;
use crate::model::HotSearchEntry;
use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const FOOTER: &str = "---
**数据说明**：
1. 榜单数据每小时更新一次
2. 热度值基于搜索量与话题讨论度计算
";

/// Renders the daily report and stores it under `<output_dir>/<date>/<date>.md`.
pub struct MarkdownReporter {
    output_dir: PathBuf,
    detail_base_url: String,
    include_cover: bool,
}

impl MarkdownReporter {
    pub fn new(output_dir: impl Into<PathBuf>, detail_base_url: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            detail_base_url: detail_base_url.into(),
            include_cover: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.report.output_dir, &config.report.detail_base_url)
            .with_cover(config.markdown.include_cover)
    }

    pub fn with_cover(mut self, include_cover: bool) -> Self {
        self.include_cover = include_cover;
        self
    }

    pub fn detail_url(&self, sentence_id: &str) -> String {
        format!(
            "{}/hot/{}",
            self.detail_base_url.trim_end_matches('/'),
            sentence_id
        )
    }

    pub fn render(
        &self,
        entries: &[HotSearchEntry],
        date: NaiveDate,
        generated_at: DateTime<Local>,
    ) -> String {
        let mut doc = format!(
            "# 🎬 抖音热搜每日播报 | {}\n\n> 数据更新于：{}\n\n",
            date.format(DATE_FORMAT),
            generated_at.format(EVENT_TIME_FORMAT)
        );

        doc.push_str("## 🔥 今日热搜TOP10\n\n");
        for entry in entries {
            self.render_entry(&mut doc, entry);
        }

        doc.push_str(FOOTER);
        doc
    }

    fn render_entry(&self, doc: &mut String, entry: &HotSearchEntry) {
        // Writing into a String cannot fail.
        let _ = writeln!(
            doc,
            "### {}. {}",
            entry.rank(),
            entry.title().unwrap_or("N/A")
        );
        let _ = writeln!(doc, "- **热度值**：`{}`", entry.display_hot_value());
        let _ = writeln!(doc, "- **上榜时间**：{}", entry.event_time());

        if self.include_cover {
            if let Some(cover) = entry.word_cover() {
                let _ = writeln!(doc, "- ![封面]({})", cover);
            }
        }

        match entry.sentence_id() {
            Ok(id) => {
                let _ = writeln!(doc, "- [查看详情]({})", self.detail_url(id));
            }
            Err(e) => warn!(rank = entry.rank(), error = %e, "Skipping detail link"),
        }
        doc.push('\n');
    }

    pub fn report_dir(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(date.format(DATE_FORMAT).to_string())
    }

    /// Writes `content` as the report for `date`, replacing any earlier one.
    pub fn persist(&self, content: &str, date: NaiveDate) -> Result<PathBuf> {
        let dir = self.report_dir(date);
        ensure_directory(&dir)?;

        let file_path = dir.join(format!("{}.md", date.format(DATE_FORMAT)));
        fs::write(&file_path, content).map_err(|e| AppError::persist_error(&file_path, e))?;
        Ok(file_path)
    }

    /// Renders and persists; failures are logged and reported as `false`.
    pub fn save(&self, entries: &[HotSearchEntry], date: NaiveDate) -> bool {
        let content = self.render(entries, date, Local::now());
        match self.persist(&content, date) {
            Ok(path) => {
                info!(path = %path.display(), "Report saved");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to save report");
                false
            }
        }
    }
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| AppError::persist_error(dir, e))?;
    info!(path = %dir.display(), "Created report directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_entries() -> Vec<HotSearchEntry> {
        vec![
            HotSearchEntry::new(1, "2024-05-01 08:00:00".into())
                .with_title(Some("五一假期出行".into()))
                .with_hot_value(Some(11_802_345_u64.into()))
                .with_word_cover(Some("https://p3.example.com/a.jpg".into()))
                .with_sentence_id(Some("1882".into())),
            HotSearchEntry::new(2, "2024-05-01 08:30:00".into())
                .with_title(Some("新歌首发".into()))
                .with_hot_value(Some(9_400_000_u64.into()))
                .with_sentence_id(Some("1907".into())),
        ]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap()
    }

    fn reporter(dir: &Path) -> MarkdownReporter {
        MarkdownReporter::new(dir, "https://www.douyin.com")
    }

    #[test]
    fn renders_known_document() {
        let doc = reporter(Path::new(".")).render(&sample_entries(), date(), generated_at());

        let expected = "# 🎬 抖音热搜每日播报 | 2024-05-01

> 数据更新于：2024-05-01 09:15:00

## 🔥 今日热搜TOP10

### 1. 五一假期出行
- **热度值**：`11802345`
- **上榜时间**：2024-05-01 08:00:00
- [查看详情](https://www.douyin.com/hot/1882)

### 2. 新歌首发
- **热度值**：`9400000`
- **上榜时间**：2024-05-01 08:30:00
- [查看详情](https://www.douyin.com/hot/1907)

---
**数据说明**：
1. 榜单数据每小时更新一次
2. 热度值基于搜索量与话题讨论度计算
";
        assert_eq!(doc, expected);
        assert_eq!(doc.matches("# 🎬 抖音热搜每日播报").count(), 1);
        assert_eq!(doc.matches("**数据说明**").count(), 1);
    }

    #[test]
    fn cover_line_is_opt_in() {
        let entries = sample_entries();
        let plain = reporter(Path::new(".")).render(&entries, date(), generated_at());
        assert!(!plain.contains("![封面]"));

        let with_cover = reporter(Path::new("."))
            .with_cover(true)
            .render(&entries, date(), generated_at());
        assert_eq!(with_cover.matches("![封面](https://p3.example.com/a.jpg)").count(), 1);
    }

    #[test]
    fn missing_fields_are_not_fabricated() {
        let entries = vec![HotSearchEntry::new(1, "2024-05-01 08:00:00".into())];
        let doc = reporter(Path::new(".")).render(&entries, date(), generated_at());

        assert!(doc.contains("### 1. N/A\n"));
        assert!(doc.contains("- **热度值**：`N/A`\n"));
        assert!(!doc.contains("/hot/"));
    }

    #[test]
    fn detail_url_tolerates_trailing_slash() {
        let r = MarkdownReporter::new(".", "https://www.douyin.com/");
        assert_eq!(r.detail_url("42"), "https://www.douyin.com/hot/42");
    }

    #[test]
    fn persist_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let r = reporter(tmp.path());

        let path = r.persist("hello", date()).unwrap();

        assert_eq!(path, tmp.path().join("2024-05-01").join("2024-05-01.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn persist_twice_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let r = reporter(tmp.path());
        let entries = sample_entries();

        let first = r.render(&entries, date(), generated_at());
        r.persist(&first, date()).unwrap();
        let second = r.render(&entries[..1], date(), generated_at());
        let path = r.persist(&second, date()).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), second);
    }

    #[test]
    fn save_reports_failure_instead_of_panicking() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let r = reporter(&blocker);
        assert!(!r.save(&sample_entries(), date()));
        assert!(matches!(
            r.persist("x", date()),
            Err(AppError::PersistError { .. })
        ));
    }

    #[test]
    fn save_writes_rendered_report() {
        let tmp = tempfile::tempdir().unwrap();
        let r = reporter(tmp.path());

        assert!(r.save(&sample_entries(), date()));

        let saved = fs::read_to_string(tmp.path().join("2024-05-01/2024-05-01.md")).unwrap();
        assert!(saved.contains("https://www.douyin.com/hot/1882"));
        assert!(saved.contains("https://www.douyin.com/hot/1907"));
    }
}
