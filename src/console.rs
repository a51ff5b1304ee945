use crate::markdown::DATE_FORMAT;
use crate::model::HotSearchEntry;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::io::{self, Write};

const RULE_WIDTH: usize = 40;

/// Live ranking for a terminal. Empty input renders nothing.
pub fn render(entries: &[HotSearchEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = format!("\n🔥 抖音实时热搜TOP10\n{}\n", "=".repeat(RULE_WIDTH));
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>2}. {}",
            entry.rank(),
            entry.title().unwrap_or("N/A")
        );
        let _ = writeln!(
            out,
            "   🔥 热度：{} | 时间：{}",
            entry.display_hot_value(),
            entry.event_time()
        );
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
    }
    out
}

pub fn display(entries: &[HotSearchEntry], out: &mut impl Write) -> io::Result<()> {
    let text = render(entries);
    if text.is_empty() {
        return Ok(());
    }
    out.write_all(text.as_bytes())
}

/// Closing block printed after a Markdown run.
pub fn render_summary(date: NaiveDate, entry_count: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\n📅 数据日期：{}\n📊 收录条目：{}条\n{rule}\n",
        date.format(DATE_FORMAT),
        entry_count
    )
}
