//! The single-page dashboard shell.
//!
//! All rendering decisions are made server-side; the page only draws the
//! latest `/api/view` snapshot with Leaflet and Chart.js.

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Eco-Guardian Dashboard</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; background: #f4f6f8; color: #2c3e50; }
  header { display: flex; align-items: center; justify-content: space-between; padding: 12px 20px; background: #27ae60; color: #fff; }
  #connection { padding: 4px 10px; border-radius: 12px; background: rgba(0, 0, 0, 0.2); }
  #stats { display: grid; grid-template-columns: repeat(7, 1fr); gap: 12px; padding: 12px 20px; }
  .card.normal .value { color: #2ecc71; }
  .card.warning .value { color: #f39c12; }
  .card.critical .value { color: #e74c3c; }
  .card { background: #fff; border-radius: 8px; padding: 12px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); }
  .card .value { font-size: 1.6em; font-weight: 600; }
  main { display: grid; grid-template-columns: 2fr 1fr; gap: 12px; padding: 0 20px 20px; }
  #map { height: 480px; border-radius: 8px; }
  .bin-icon { display: flex; align-items: center; justify-content: center; width: 36px; height: 36px; border-radius: 50%; color: #fff; font-size: 11px; font-weight: 600; border: 2px solid #fff; }
  #alerts .alert { border-bottom: 1px solid #ecf0f1; padding: 6px 0; }
  #alerts .actions { margin-top: 4px; }
  #alerts button { margin-right: 6px; }
  #notification { position: fixed; right: 20px; bottom: 20px; padding: 10px 16px; border-radius: 6px; background: #2c3e50; color: #fff; display: none; }
  #notification.error { background: #e74c3c; }
</style>
</head>
<body>
<header>
  <h1>Eco-Guardian</h1>
  <span id="connection">Connecting</span>
</header>
<section id="stats">
  <div class="card"><div>Total bins</div><div class="value" id="total-bins">0</div></div>
  <div class="card"><div>Active alerts</div><div class="value" id="total-alerts">0</div></div>
  <div class="card"><div>Average fill</div><div class="value" id="average-fill">0%</div></div>
  <div class="card"><div>CO2 saved</div><div class="value" id="co2-saved">0%</div></div>
  <div class="card normal"><div>Normal</div><div class="value" id="count-normal">0</div></div>
  <div class="card warning"><div>Getting full</div><div class="value" id="count-warning">0</div></div>
  <div class="card critical"><div>Critical</div><div class="value" id="count-critical">0</div></div>
</section>
<main>
  <div id="map"></div>
  <div>
    <div class="card">
      <h3 id="chart-title">Select a bin</h3>
      <canvas id="chart" width="240" height="240"></canvas>
    </div>
    <div class="card" id="alerts"></div>
    <div class="card"><h3>Collection route</h3><div id="route"></div></div>
    <div class="card"><small>Last update: <span id="last-update">never</span></small></div>
  </div>
</main>
<div id="notification"></div>
<script>
const map = L.map("map").setView([28.7041, 77.1025], 12);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors",
}).addTo(map);

const markers = new Map();
const resolvedAlerts = new Set();
let chart = null;
let chartRevision = -1;
let localToastUntil = 0;

function escapeHtml(value) {
  return String(value)
    .replace(/&/g, "&amp;")
    .replace(/</g, "&lt;")
    .replace(/>/g, "&gt;")
    .replace(/"/g, "&quot;")
    .replace(/'/g, "&#39;");
}

function icon(marker) {
  return L.divIcon({
    className: "",
    html: `<div class="bin-icon" style="background:${escapeHtml(marker.color)}">` +
      `${escapeHtml(marker.iconText)}</div>`,
    iconSize: [36, 36],
  });
}

function popup(marker) {
  const p = marker.popup;
  return `<strong>${escapeHtml(p.title)}</strong><br>${escapeHtml(p.fillText)}<br>` +
    `${escapeHtml(p.statusText)}<br>` +
    `<button onclick="selectBin(${Number(marker.binId)})">${escapeHtml(p.actionLabel)}</button>`;
}

function drawMarkers(list) {
  for (const marker of list) {
    const existing = markers.get(marker.binId);
    if (existing) {
      existing.setLatLng([marker.latitude, marker.longitude]);
      existing.setIcon(icon(marker));
      existing.setPopupContent(popup(marker));
    } else {
      const created = L.marker([marker.latitude, marker.longitude], { icon: icon(marker) })
        .bindPopup(popup(marker))
        .addTo(map);
      markers.set(marker.binId, created);
    }
  }
}

function drawChart(view) {
  if (!view || view.revision === chartRevision) return;
  chartRevision = view.revision;
  if (chart) chart.destroy();
  document.getElementById("chart-title").textContent = view.title;
  chart = new Chart(document.getElementById("chart"), {
    type: "doughnut",
    data: {
      labels: view.labels,
      datasets: [{ data: view.data, backgroundColor: view.colors }],
    },
    options: { cutout: `${view.cutoutPercent}%`, plugins: { legend: { position: "bottom" } } },
  });
}

const ACTION_LABELS = { view: "View", resolve: "Resolve" };

function viewAlert(item) {
  const [lat, lng] = item.location.split(",").map(Number);
  if (Number.isFinite(lat) && Number.isFinite(lng)) {
    map.setView([lat, lng], 15);
  }
  showLocal(`${item.typeLabel} at ${item.location}`, "info");
}

function resolveAlert(item) {
  resolvedAlerts.add(item.id);
  showLocal(`Marked alert #${item.id} as resolved`, "info");
  poll();
}

function drawAlerts(list) {
  const el = document.getElementById("alerts");
  el.replaceChildren();

  const items = list.items.filter((item) => !resolvedAlerts.has(item.id));
  if (items.length === 0) {
    const empty = document.createElement("p");
    empty.textContent = list.placeholder || "No active alerts";
    el.appendChild(empty);
    return;
  }

  for (const item of items) {
    const entry = document.createElement("div");
    entry.className = "alert";

    const label = document.createElement("strong");
    label.textContent = item.typeLabel;
    const details = document.createElement("small");
    details.textContent = `${item.location} \u00b7 ${item.timeText}`;

    const actions = document.createElement("div");
    actions.className = "actions";
    for (const action of item.actions) {
      const button = document.createElement("button");
      button.textContent = ACTION_LABELS[action] || action;
      button.addEventListener("click", () =>
        action === "resolve" ? resolveAlert(item) : viewAlert(item));
      actions.appendChild(button);
    }

    entry.append(label, document.createElement("br"), details, actions);
    el.appendChild(entry);
  }
}

function drawRoute(route) {
  const el = document.getElementById("route");
  const summary = document.createElement("p");
  summary.textContent = route.summary;
  const stops = document.createElement("ol");
  for (const stop of route.stops) {
    const li = document.createElement("li");
    li.textContent = `${stop.name} (${stop.fillLevel.toFixed(0)}%)`;
    stops.appendChild(li);
  }
  el.replaceChildren(summary, stops);
}

function showLocal(message, level) {
  localToastUntil = Date.now() + 3000;
  const el = document.getElementById("notification");
  el.textContent = message;
  el.className = level;
  el.style.display = "block";
}

function notify(notification) {
  if (Date.now() < localToastUntil) return;
  const el = document.getElementById("notification");
  if (!notification) {
    el.style.display = "none";
    return;
  }
  el.textContent = notification.message;
  el.className = notification.level;
  el.style.display = "block";
}

function draw(view) {
  document.getElementById("connection").textContent =
    view.connection.charAt(0).toUpperCase() + view.connection.slice(1);
  document.getElementById("total-bins").textContent = view.stats.totalBins;
  document.getElementById("total-alerts").textContent = view.stats.totalAlerts;
  document.getElementById("average-fill").textContent = `${view.stats.averageFillLevel.toFixed(1)}%`;
  document.getElementById("co2-saved").textContent = `${view.stats.co2Saved}%`;
  document.getElementById("count-normal").textContent = view.stats.statusCounts.normal;
  document.getElementById("count-warning").textContent = view.stats.statusCounts.warning;
  document.getElementById("count-critical").textContent = view.stats.statusCounts.critical;
  document.getElementById("last-update").textContent = new Date(view.stats.lastUpdate).toLocaleTimeString();
  drawMarkers(view.markers);
  drawAlerts(view.alerts);
  drawRoute(view.route);
  drawChart(view.chart);
  notify(view.notification);
}

async function poll() {
  try {
    const response = await fetch("/api/view");
    draw(await response.json());
  } catch (e) {
    document.getElementById("connection").textContent = "Disconnected";
  }
}

async function selectBin(id) {
  const response = await fetch(`/api/bins/${id}/select`, { method: "POST" });
  if (response.ok) drawChart(await response.json());
  map.closePopup();
  poll();
}

poll();
setInterval(poll, 2000);
</script>
</body>
</html>
"##;
