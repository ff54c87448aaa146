use crate::calendar::{date_key, month_key, next_month, previous_month, CalendarSelector};
use crate::panel::PanelState;
use crate::slots::{percent_complete, progress_text, slot_statuses, status_text};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

pub struct PageView<'a> {
    pub calendar: &'a CalendarSelector,
    pub panel: &'a PanelState,
    pub now: NaiveDateTime,
}

pub fn render_index(view: &PageView<'_>) -> String {
    let panel = view.panel;
    let date = panel.date();
    let total = panel.slots().len();
    let completed = panel.completed_count();
    let all_done = total > 0 && completed == total;

    INDEX_HTML
        .replace("{{DATE}}", &date_key(date))
        .replace("{{DATE_TITLE}}", &date.format("%A, %B %-d, %Y").to_string())
        .replace("{{CALENDAR}}", &render_calendar(view.calendar, view.now.date()))
        .replace("{{PERCENT}}", &percent_complete(completed, total).to_string())
        .replace("{{PROGRESS_TEXT}}", &progress_text(completed, total))
        .replace("{{STATUS_CLASS}}", if all_done { "done" } else { "" })
        .replace("{{STATUS_TEXT}}", status_text(completed, total))
        .replace("{{SLOTS}}", &render_slots(panel, view.now))
}

fn render_calendar(calendar: &CalendarSelector, today: NaiveDate) -> String {
    let selected = calendar.selected();
    let visible = calendar.visible_month();
    let selected_key = date_key(selected);

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<nav class="month-nav">
        <a href="/?date={sel}&amp;month={prev}" aria-label="Previous month">&lsaquo;</a>
        <span class="month-title">{title}</span>
        <a href="/?date={sel}&amp;month={next}" aria-label="Next month">&rsaquo;</a>
      </nav>
      <table class="calendar">
        <thead><tr><th>Mo</th><th>Tu</th><th>We</th><th>Th</th><th>Fr</th><th>Sa</th><th>Su</th></tr></thead>
        <tbody>"#,
        sel = selected_key,
        prev = month_key(previous_month(visible)),
        next = month_key(next_month(visible)),
        title = calendar.month_title(),
    );

    for week in calendar.month_grid() {
        html.push_str("<tr>");
        for cell in week {
            match cell {
                Some(day) => {
                    let mut classes = vec!["day"];
                    if day == selected {
                        classes.push("selected");
                    }
                    if day == today {
                        classes.push("today");
                    }
                    let _ = write!(
                        html,
                        r#"<td><a class="{}" href="/?date={}">{}</a></td>"#,
                        classes.join(" "),
                        date_key(day),
                        day.format("%-d"),
                    );
                }
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn render_slots(panel: &PanelState, now: NaiveDateTime) -> String {
    if panel.slots().is_empty() {
        return r#"<p class="hint">No time slots configured.</p>"#.to_string();
    }

    let date = date_key(panel.date());
    let statuses = slot_statuses(panel.labels(), &panel.progress(), panel.date(), now);
    // Status each slot falls back to when it is undone.
    let open = slot_statuses(panel.labels(), &vec![false; statuses.len()], panel.date(), now);
    let mut html = String::new();
    let rows = panel.slots().iter().zip(statuses).zip(open);
    for (index, ((slot, status), open)) in rows.enumerate() {
        let _ = write!(
            html,
            r#"<form class="slot-form" method="post" action="/toggle/{date}/{index}" data-index="{index}">
          <button type="submit" class="slot {class}" data-completed="{completed}" data-sync="pending"
                  data-open="{open_class}" data-open-mark="{open_mark}">
            <span class="slot-label">{label}</span><span class="slot-mark">{mark}</span>
          </button>
        </form>
        "#,
            class = status.css_class(),
            completed = slot.completed,
            label = escape_html(&panel.label(index)),
            mark = status.mark(),
            open_class = open.css_class(),
            open_mark = open.mark(),
        );
    }
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Squats Tracker</title>
  <style>
    :root {
      --bg: #f0f0f0;
      --card: #ffffff;
      --ink: #333333;
      --muted: #6b6b6b;
      --done: #006600;
      --missed: #990000;
      --current: #3333ff;
      --shadow: 0 18px 40px rgba(0, 0, 0, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Helvetica Neue", Helvetica, Arial, sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 16px;
    }

    .app {
      width: min(900px, 100%);
      display: grid;
      grid-template-columns: minmax(260px, 1fr) 2fr;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    h1 {
      grid-column: 1 / -1;
      margin: 0;
      font-size: 2rem;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .month-nav {
      display: flex;
      justify-content: space-between;
      align-items: center;
      margin-bottom: 8px;
    }

    .month-nav a {
      text-decoration: none;
      font-size: 1.4rem;
      color: var(--ink);
      padding: 0 8px;
    }

    .calendar {
      width: 100%;
      border-collapse: collapse;
      text-align: center;
    }

    .calendar th {
      font-size: 0.75rem;
      color: var(--muted);
      padding: 4px 0;
    }

    .calendar .day {
      display: block;
      padding: 6px 0;
      border-radius: 8px;
      color: var(--ink);
      text-decoration: none;
    }

    .calendar .day.today {
      font-weight: 700;
    }

    .calendar .day.selected {
      background: var(--ink);
      color: white;
    }

    .bar {
      height: 12px;
      background: #e4e4e4;
      border-radius: 999px;
      overflow: hidden;
    }

    .bar-fill {
      height: 100%;
      background: var(--done);
      transition: width 200ms ease;
    }

    .progress-text {
      margin: 10px 0 4px;
    }

    .status-line {
      margin: 0 0 16px;
      font-weight: 700;
    }

    .status-line.done {
      color: var(--done);
    }

    .slots {
      display: grid;
      gap: 6px;
    }

    .slot-form {
      margin: 0;
    }

    .slot {
      width: 100%;
      display: flex;
      justify-content: space-between;
      border: 1px solid #d6d6d6;
      background: white;
      border-radius: 10px;
      padding: 10px 14px;
      font-size: 1rem;
      cursor: pointer;
    }

    .slot.missed {
      color: var(--missed);
    }

    .slot.current {
      color: var(--current);
      font-weight: 700;
    }

    .slot.completed {
      color: var(--done);
      font-weight: 400;
    }

    .slot[data-sync="submitting"] {
      opacity: 0.6;
    }

    .slot[data-sync="failed"] {
      border-color: var(--missed);
    }

    .flash {
      min-height: 1.2em;
      margin-top: 12px;
      color: var(--muted);
    }

    .flash[data-type="error"] {
      color: var(--missed);
    }

    .flash[data-type="ok"] {
      color: var(--done);
    }

    .hint {
      color: var(--muted);
    }

    @media (max-width: 680px) {
      .app {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app" data-date="{{DATE}}">
    <h1>Squats Tracker</h1>

    <section class="card">
      {{CALENDAR}}
    </section>

    <section class="card">
      <h2>Progress for {{DATE_TITLE}}</h2>
      <div class="bar"><div class="bar-fill" id="bar" style="width: {{PERCENT}}%"></div></div>
      <p class="progress-text" id="progress-text">{{PROGRESS_TEXT}}</p>
      <p class="status-line {{STATUS_CLASS}}" id="status-line">{{STATUS_TEXT}}</p>
      <div class="slots">
        {{SLOTS}}
      </div>
      <div class="flash" id="flash"></div>
    </section>
  </main>

  <script>
    const selectedDate = document.querySelector('main').dataset.date;
    const flashEl = document.getElementById('flash');
    const barEl = document.getElementById('bar');
    const progressEl = document.getElementById('progress-text');
    const statusEl = document.getElementById('status-line');
    const buttons = () => Array.from(document.querySelectorAll('.slot'));

    const flash = (message, type) => {
      flashEl.textContent = message;
      flashEl.dataset.type = type || '';
    };

    const paint = (button, completed, sync) => {
      button.dataset.completed = String(completed);
      button.dataset.sync = sync;
      button.classList.toggle('completed', completed);
      button.classList.toggle(button.dataset.open, !completed);
      button.querySelector('.slot-mark').textContent = completed ? '✔' : button.dataset.openMark;
    };

    const refreshSummary = () => {
      const all = buttons();
      const done = all.filter((b) => b.dataset.completed === 'true').length;
      const total = all.length;
      barEl.style.width = `${total ? Math.round((done / total) * 100) : 0}%`;
      progressEl.textContent = `Progress: ${done}/${total}`;
      const finished = total > 0 && done === total;
      statusEl.textContent = finished ? 'Way to go! You completed your squats for today!' : 'Keep going!';
      statusEl.classList.toggle('done', finished);
    };

    const toggle = async (form) => {
      const button = form.querySelector('button');
      if (button.dataset.sync === 'submitting') {
        return;
      }
      const index = Number(form.dataset.index);
      const before = button.dataset.completed === 'true';
      paint(button, !before, 'submitting');
      refreshSummary();

      try {
        const res = await fetch(`/api/progress/${selectedDate}/${index}`, { method: 'POST' });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        const data = await res.json();
        const confirmed = data.updated[index];
        if (typeof confirmed !== 'boolean') {
          throw new Error('Server response is missing this slot');
        }
        paint(button, confirmed, 'confirmed');
        flash(data.message || 'Saved', 'ok');
      } catch (err) {
        paint(button, before, 'failed');
        flash(err.message, 'error');
      }
      refreshSummary();
    };

    document.querySelectorAll('form.slot-form').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        toggle(form);
      });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn march_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn renders_controls_for_the_loaded_day() {
        let calendar = CalendarSelector::new(march_5());
        let panel = PanelState::loaded(
            march_5(),
            &[true, false, false],
            vec!["8:00 AM".into(), "8:45 AM".into(), "9:30 AM".into()],
        );
        let html = render_index(&PageView {
            calendar: &calendar,
            panel: &panel,
            now: march_5().and_hms_opt(9, 0, 0).unwrap(),
        });

        assert_eq!(html.matches(r#"class="slot-form""#).count(), 3);
        assert_eq!(html.matches(r#"data-completed="true""#).count(), 1);
        assert!(html.contains(r#"action="/toggle/2024-03-05/1""#));
        assert!(html.contains("slot current"));
        assert!(html.contains(r#"class="slot completed" data-completed="true""#));
        assert!(html.contains(r#"data-open="missed" data-open-mark="✗""#));
        assert!(html.contains(r#"data-open="pending" data-open-mark="""#));
        assert!(html.contains("Progress: 1/3"));
        assert!(html.contains("Keep going!"));
        assert!(html.contains(r#"class="day selected today""#));
        assert!(html.contains("month=2024-02"));
        assert!(html.contains("month=2024-04"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn full_day_gets_the_all_done_line() {
        let calendar = CalendarSelector::new(march_5());
        let panel = PanelState::loaded(march_5(), &[true, true], Vec::new());
        let html = render_index(&PageView {
            calendar: &calendar,
            panel: &panel,
            now: march_5().and_hms_opt(18, 0, 0).unwrap(),
        });
        assert!(html.contains("Way to go! You completed your squats for today!"));
        assert!(html.contains("Slot 2"));
        assert!(html.contains("width: 100%"));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(escape_html(r#"<b>"noon"</b>"#), "&lt;b&gt;&quot;noon&quot;&lt;/b&gt;");
    }
}
