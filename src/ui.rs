use crate::entries::list_entries;
use crate::models::{Entry, JournalData, VocabularyItem};
use crate::selection::Selection;
use crate::wheel::{slices, WheelSlice};
use std::fmt::Write as _;

pub fn render_index(data: &JournalData, selection: &Selection, history_limit: usize) -> String {
    let mut body_class = escape_html(&data.preferences.theme);
    if data.preferences.dark_mode {
        if !body_class.is_empty() {
            body_class.push(' ');
        }
        body_class.push_str("dark-mode");
    }

    INDEX_HTML
        .replace("{{LANG}}", &escape_html(&data.preferences.language))
        .replace("{{BODY_CLASS}}", &body_class)
        .replace("{{SELECTED}}", &escape_html(selection.current().unwrap_or("")))
        .replace("{{WHEEL}}", &render_wheel(&slices(&data.emotions)))
        .replace("{{EMOTION_OPTIONS}}", &render_emotion_options(&data.emotions, selection))
        .replace("{{EMOTIONS}}", &render_emotion_list(&data.emotions))
        .replace("{{TAGS}}", &render_tags(&data.tags))
        .replace("{{ENTRIES}}", &render_entries(&list_entries(data, Some(history_limit))))
}

fn render_wheel(wheel: &[WheelSlice]) -> String {
    let mut svg = String::new();
    for slice in wheel {
        let label = escape_html(&slice.label);
        let _ = write!(
            svg,
            r#"<path class="slice" d="{path}" fill="{color}" tabindex="0" role="option" aria-label="{label}" data-emotion="{label}"></path>"#,
            path = slice.path,
            color = escape_html(&slice.color),
        );
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" dominant-baseline="central">{label}</text>"#,
            x = slice.label_x,
            y = slice.label_y,
        );
    }
    svg
}

fn render_emotion_options(emotions: &[VocabularyItem], selection: &Selection) -> String {
    let mut options = String::from(r#"<option value="">Pick from the wheel</option>"#);
    for emotion in emotions {
        let selected = if selection.current() == Some(emotion.name.as_str()) {
            " selected"
        } else {
            ""
        };
        let name = escape_html(&emotion.name);
        let _ = write!(options, r#"<option value="{name}"{selected}>{name}</option>"#);
    }
    options
}

fn render_emotion_list(emotions: &[VocabularyItem]) -> String {
    let mut html = String::new();
    for emotion in emotions {
        let name = escape_html(&emotion.name);
        let _ = write!(
            html,
            r#"<span class="tag">{name} <button type="button" class="emotion-remove" data-emotion="{name}" aria-label="Remove {name}">&times;</button></span>"#
        );
    }
    html
}

fn render_tags(tags: &[VocabularyItem]) -> String {
    let mut html = String::new();
    for tag in tags {
        let name = escape_html(&tag.name);
        let _ = write!(
            html,
            r#"<label class="tag"><input type="checkbox" name="tags" value="{name}" /> {name} <button type="button" class="tag-remove" data-tag="{name}" aria-label="Remove {name}">&times;</button></label>"#
        );
    }
    html
}

fn render_entries(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return r#"<li class="empty">No entries yet.</li>"#.to_string();
    }

    let mut html = String::new();
    for entry in entries {
        let mut vitals = Vec::new();
        if let Some(bp) = &entry.blood_pressure {
            vitals.push(format!("BP: {}", escape_html(bp)));
        }
        if let Some(weight) = entry.weight_kg {
            vitals.push(format!("Wt: {weight}kg"));
        }
        if let Some(intensity) = &entry.intensity {
            vitals.push(format!("Phys: {}", escape_html(intensity)));
        }
        if !entry.tags.is_empty() {
            let tags: Vec<_> = entry.tags.iter().map(|tag| escape_html(tag)).collect();
            vitals.push(tags.join(", "));
        }

        let _ = write!(
            html,
            r#"<li><b>{date}</b> <span class="emotion">{emotion}</span> <small>{vitals}</small> <em>{note}</em> <button type="button" class="entry-remove" data-id="{id}" aria-label="Delete entry">&times;</button></li>"#,
            date = entry.timestamp.format("%Y-%m-%d %H:%M"),
            emotion = escape_html(&entry.emotion),
            vitals = vitals.join(" · "),
            note = escape_html(&entry.note),
            id = entry.id,
        );
    }
    html
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub const SERVICE_WORKER_JS: &str = r#"const CACHE = 'emotion-journal-cache-v1';
const ASSETS = ['/', '/manifest.json'];

self.addEventListener('install', (event) => {
  event.waitUntil(caches.open(CACHE).then((cache) => cache.addAll(ASSETS)));
});

self.addEventListener('activate', (event) => {
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(keys.filter((key) => key !== CACHE).map((key) => caches.delete(key)))
    )
  );
});

self.addEventListener('fetch', (event) => {
  const url = new URL(event.request.url);
  if (event.request.method !== 'GET' || url.origin !== self.location.origin || url.pathname.startsWith('/api/')) {
    return;
  }
  event.respondWith(
    caches.match(event.request).then((cached) => {
      const network = fetch(event.request)
        .then((response) => {
          if (response.ok) {
            const copy = response.clone();
            caches.open(CACHE).then((cache) => cache.put(event.request, copy));
          }
          return response;
        })
        .catch(() => cached || caches.match('/'));
      return cached || network;
    })
  );
});
"#;

pub const MANIFEST_JSON: &str = r##"{
  "name": "Emotion Journal",
  "short_name": "Journal",
  "start_url": "/",
  "display": "standalone",
  "background_color": "#f8f3e6",
  "theme_color": "#2f4858"
}
"##;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Emotion Journal</title>
  <link rel="manifest" href="/manifest.json" />
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    body.theme-ocean { --bg-1: #e6f3f8; --bg-2: #a7d3f5; --accent: #1f7a8c; }
    body.theme-forest { --bg-1: #eef6e6; --bg-2: #b8dca7; --accent: #3f7d20; }
    body.dark-mode { --bg-1: #1d1f24; --bg-2: #2b2f38; --ink: #eceae6; --card: rgba(35, 39, 47, 0.92); }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), var(--bg-1) 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header { display: flex; flex-wrap: wrap; gap: 12px; align-items: center; justify-content: space-between; }
    h1 { font-family: "Fraunces", "Georgia", serif; margin: 0; }
    .controls { display: flex; gap: 8px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 24px; }
    .slice { cursor: pointer; stroke: white; stroke-width: 2; }
    .slice:focus { outline: none; stroke: var(--ink); }
    #emotion-wheel text { pointer-events: none; font-size: 0.8rem; fill: #23272f; }
    form { display: grid; gap: 10px; }
    .tags { display: flex; flex-wrap: wrap; gap: 6px; }
    .tag { background: white; border-radius: 999px; padding: 4px 10px; color: #2b2a28; }
    button { border: none; border-radius: 999px; padding: 10px 16px; font-weight: 600; cursor: pointer; background: var(--accent-2); color: white; }
    button:disabled { opacity: 0.5; cursor: not-allowed; }
    .tag-remove, .emotion-remove, .entry-remove { background: transparent; color: var(--accent); padding: 0 4px; }
    #entries { list-style: none; padding: 0; display: grid; gap: 8px; }
    #entries li { display: flex; gap: 8px; align-items: baseline; flex-wrap: wrap; }
    .chart-card svg { width: 100%; height: auto; background: white; border-radius: 18px; }
    .chart-line { fill: none; stroke: #3e95cd; stroke-width: 3; }
    .chart-point { fill: white; stroke: #3e95cd; stroke-width: 2; }
    .chart-label { font-size: 11px; fill: #8b857d; }
    .status { min-height: 1.2em; }
    .status[data-type="error"] { color: #e74c3c; }
    .status[data-type="ok"] { color: #2ecc71; }
    pre { max-height: 200px; overflow: auto; background: #eee; color: #2b2a28; padding: 8px; }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <main class="app">
    <header>
      <h1>Emotion Journal</h1>
      <div class="controls">
        <select id="theme-select" aria-label="Theme">
          <option value="">Default</option>
          <option value="theme-ocean">Ocean</option>
          <option value="theme-forest">Forest</option>
        </select>
        <select id="lang-select" aria-label="Language">
          <option value="en">English</option>
          <option value="de">Deutsch</option>
          <option value="es">Español</option>
        </select>
        <button type="button" id="dark-toggle">Dark mode</button>
      </div>
    </header>

    <section class="grid">
      <div>
        <svg id="emotion-wheel" viewBox="0 0 320 320" role="listbox" aria-label="Emotion wheel">{{WHEEL}}</svg>
        <p>Selected: <strong id="selected-emotion">{{SELECTED}}</strong></p>
      </div>

      <form id="track-form">
        <select id="emotion-select" aria-label="Emotion">{{EMOTION_OPTIONS}}</select>
        <input id="intensity" placeholder="Physical state (e.g. Average)" />
        <input id="bp" placeholder="Blood pressure, e.g. 120/80" />
        <input id="weight" type="number" step="0.1" min="10" max="300" placeholder="Weight (kg)" />
        <textarea id="note" maxlength="250" placeholder="Thoughts"></textarea>
        <div class="tags" id="activity-tags">{{TAGS}}</div>
        <button type="submit" id="submit-entry">Log entry</button>
      </form>
    </section>

    <section class="grid">
      <form id="emotion-form">
        <input id="new-emotion-name" placeholder="New emotion" />
        <input id="new-emotion-color" type="color" value="#888888" />
        <button type="submit">Add emotion</button>
        <div class="tags" id="emotion-list">{{EMOTIONS}}</div>
      </form>
      <form id="tag-form">
        <input id="new-tag-name" placeholder="New activity tag" />
        <button type="submit">Add tag</button>
      </form>
    </section>

    <section>
      <h2>Recent entries</h2>
      <ul id="entries">{{ENTRIES}}</ul>
    </section>

    <section class="chart-card">
      <h2>Mood trend</h2>
      <div class="controls">
        <button type="button" data-zoom="in">Zoom in</button>
        <button type="button" data-zoom="out">Zoom out</button>
        <button type="button" data-zoom="reset">Reset</button>
      </div>
      <svg id="trend-chart" viewBox="0 0 600 260" role="img" aria-label="Average mood per day"></svg>
      <h2>Emotions per day</h2>
      <svg id="count-chart" viewBox="0 0 600 260" role="img" aria-label="Emotion counts per day"></svg>
    </section>

    <section>
      <a href="/api/export" download><button type="button">Export data</button></a>
      <input type="file" id="import-file" accept="application/json" />
      <div id="import-preview"></div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const selectedEl = document.getElementById('selected-emotion');
    const selectEl = document.getElementById('emotion-select');
    const submitEl = document.getElementById('submit-entry');
    const previewEl = document.getElementById('import-preview');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (type === 'ok') {
        setTimeout(() => setStatus('', ''), 1500);
      }
    };

    const api = async (method, url, body, raw) => {
      const res = await fetch(url, {
        method,
        headers: raw ? {} : { 'content-type': 'application/json' },
        body: raw ? body : body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const err = await res.json().catch(() => ({ error: 'Request failed' }));
        throw new Error(err.error);
      }
      return res.status === 204 ? null : res.json();
    };

    const reload = () => window.location.reload();
    const fail = (err) => setStatus(err.message, 'error');

    const updateSelection = (emotion) => {
      selectedEl.textContent = emotion || '';
      selectEl.value = emotion || '';
      submitEl.disabled = !emotion;
    };

    const pick = (emotion) =>
      api('POST', '/api/selection', { emotion })
        .then((res) => updateSelection(res.selected))
        .catch(fail);

    document.querySelectorAll('.slice').forEach((slice) => {
      slice.addEventListener('click', () => pick(slice.dataset.emotion));
      slice.addEventListener('keydown', (event) => {
        if (event.key === 'Enter' || event.key === ' ') {
          pick(slice.dataset.emotion);
        }
      });
    });
    selectEl.addEventListener('change', () => selectEl.value && pick(selectEl.value));
    updateSelection(selectedEl.textContent);

    document.getElementById('track-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const tags = Array.from(document.querySelectorAll('input[name="tags"]:checked')).map((el) => el.value);
      api('POST', '/api/entries', {
        intensity: document.getElementById('intensity').value,
        bloodPressure: document.getElementById('bp').value,
        weightKg: document.getElementById('weight').value,
        note: document.getElementById('note').value,
        tags
      }).then(reload).catch(fail);
    });

    document.getElementById('emotion-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('POST', '/api/emotions', {
        name: document.getElementById('new-emotion-name').value,
        color: document.getElementById('new-emotion-color').value
      }).then(reload).catch(fail);
    });

    document.getElementById('tag-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('POST', '/api/tags', { name: document.getElementById('new-tag-name').value })
        .then(reload)
        .catch(fail);
    });

    document.querySelectorAll('.tag-remove').forEach((button) => {
      button.addEventListener('click', () =>
        api('DELETE', `/api/tags/${encodeURIComponent(button.dataset.tag)}`).then(reload).catch(fail)
      );
    });

    document.querySelectorAll('.emotion-remove').forEach((button) => {
      button.addEventListener('click', () =>
        api('DELETE', `/api/emotions/${encodeURIComponent(button.dataset.emotion)}`).then(reload).catch(fail)
      );
    });

    document.querySelectorAll('.entry-remove').forEach((button) => {
      button.addEventListener('click', () =>
        api('DELETE', `/api/entries/${button.dataset.id}`).then(reload).catch(fail)
      );
    });

    const themeEl = document.getElementById('theme-select');
    const langEl = document.getElementById('lang-select');
    themeEl.value = Array.from(document.body.classList).find((name) => name.startsWith('theme-')) || '';
    langEl.value = document.documentElement.lang;
    themeEl.addEventListener('change', () => api('PUT', '/api/preferences', { theme: themeEl.value }).then(reload).catch(fail));
    langEl.addEventListener('change', () => api('PUT', '/api/preferences', { language: langEl.value }).then(reload).catch(fail));
    document.getElementById('dark-toggle').addEventListener('click', () => {
      const darkMode = !document.body.classList.contains('dark-mode');
      api('PUT', '/api/preferences', { darkMode }).then(reload).catch(fail);
    });

    document.getElementById('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      try {
        const preview = await api('POST', '/api/import', await file.text(), true);
        previewEl.innerHTML = '<pre></pre><button type="button" id="confirm-import">Confirm import</button> <button type="button" id="cancel-import">Cancel</button>';
        previewEl.querySelector('pre').textContent = JSON.stringify(preview.document, null, 2);
        document.getElementById('confirm-import').addEventListener('click', () =>
          api('POST', '/api/import/confirm').then(reload).catch(fail)
        );
        document.getElementById('cancel-import').addEventListener('click', () =>
          api('DELETE', '/api/import').then(() => { previewEl.innerHTML = ''; }).catch(fail)
        );
      } catch (err) {
        fail(new Error('Invalid import file.'));
      }
    });

    const SVG_NS = 'http://www.w3.org/2000/svg';
    const svgEl = (tag, attrs, text) => {
      const el = document.createElementNS(SVG_NS, tag);
      Object.entries(attrs).forEach(([key, value]) => el.setAttribute(key, value));
      if (text !== undefined) {
        el.textContent = text;
      }
      return el;
    };
    const noData = (svg) =>
      svg.replaceChildren(svgEl('text', { class: 'chart-label', x: '50%', y: '50%', 'text-anchor': 'middle' }, 'No data yet'));

    const renderLineChart = (svg, labels, values, range) => {
      const points = labels.map((label, index) => ({ label, value: values[index] })).filter((p) => p.value !== null);
      if (!points.length) {
        noData(svg);
        return;
      }
      const width = 600, height = 260, padX = 44, padY = 34, top = 24;
      const span = Math.max(range.max - range.min, 1);
      const xStep = points.length > 1 ? (width - padX * 2) / (points.length - 1) : 0;
      const x = (index) => padX + index * xStep;
      const clamp = (value) => Math.min(Math.max(value, range.min), range.max);
      const y = (value) => height - padY - ((clamp(value) - range.min) / span) * (height - top - padY);
      const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(2)} ${y(p.value).toFixed(2)}`).join(' ');
      svg.replaceChildren(
        svgEl('path', { class: 'chart-line', d: path }),
        ...points.map((p, i) => svgEl('circle', { class: 'chart-point', cx: x(i), cy: y(p.value), r: 4 })),
        ...points.map((p, i) =>
          svgEl('text', { class: 'chart-label', x: x(i), y: height - padY + 18, 'text-anchor': 'middle' }, p.label.slice(5))
        )
      );
    };

    const renderStackedChart = (svg, counts) => {
      if (!counts.dates.length) {
        noData(svg);
        return;
      }
      const width = 600, height = 260, padX = 44, padY = 34, top = 24;
      const totals = counts.dates.map((_, i) => counts.series.reduce((sum, s) => sum + s.counts[i], 0));
      const max = Math.max(...totals, 1);
      const band = (width - padX * 2) / counts.dates.length;
      const scale = (height - top - padY) / max;
      const nodes = [];
      counts.dates.forEach((date, i) => {
        let base = height - padY;
        counts.series.forEach((s) => {
          const h = s.counts[i] * scale;
          if (h > 0) {
            base -= h;
            const rect = svgEl('rect', { x: padX + i * band + 4, y: base, width: band - 8, height: h, fill: s.color || '#888888' });
            rect.appendChild(svgEl('title', {}, `${s.emotion}: ${s.counts[i]}`));
            nodes.push(rect);
          }
        });
        nodes.push(svgEl('text', { class: 'chart-label', x: padX + i * band + band / 2, y: height - padY + 18, 'text-anchor': 'middle' }, date.slice(5)));
      });
      svg.replaceChildren(...nodes);
    };

    const trendEl = document.getElementById('trend-chart');
    const trendRange = { min: 0, max: 4 };
    let trend = { labels: [], values: [], levels: 5 };
    const drawTrend = () => renderLineChart(trendEl, trend.labels, trend.values, trendRange);
    const resetZoom = () => {
      trendRange.min = 0;
      trendRange.max = Math.max(trend.levels - 1, 1);
    };

    document.querySelectorAll('[data-zoom]').forEach((button) => {
      button.addEventListener('click', () => {
        if (button.dataset.zoom === 'in') {
          trendRange.max = Math.max(1, trendRange.max - 1);
          trendRange.min = Math.min(trendRange.max - 1, trendRange.min + 1);
        } else if (button.dataset.zoom === 'out') {
          trendRange.max += 1;
          trendRange.min = Math.max(0, trendRange.min - 1);
        } else {
          resetZoom();
        }
        drawTrend();
      });
    });

    api('GET', '/api/stats')
      .then((stats) => {
        trend = {
          labels: stats.trend.map((p) => p.date),
          values: stats.trend.map((p) => p.average),
          levels: stats.levels
        };
        resetZoom();
        drawTrend();
        renderStackedChart(document.getElementById('count-chart'), stats.counts);
      })
      .catch(fail);

    if ('serviceWorker' in navigator) {
      navigator.serviceWorker.register('/service-worker.js').catch(() => {});
    }
  </script>
</body>
</html>
"##;
