//! Maud templates for the dashboard: message and user fragments, channel
//! tabs and panes, and the page shell.
//!
//! Maud escapes every interpolated string, so sender calls and message
//! text can never break out of their elements. The one deliberately
//! pre-escaped injection point is the gateway's own connection fragment
//! (see `connection_fragment`).

use chrono::{Local, TimeZone};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::Value;
use wavechat_core::board::{ChannelBoard, ChannelTab};
use wavechat_core::color::label_color;
use wavechat_core::stats::{pretty_stats, StatsSummary};
use wavechat_core::Message;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// One message row: local timestamp, color-hashed sender call, text.
pub fn message_row(message: &Message) -> Markup {
    let color = label_color(&message.from_call).hex();
    html! {
        div class="row message-row" {
            div class="col-2 message-time" { (format_timestamp(message.timestamp)) }
            div class="col-2 message-call" style=(format!("color:{color};")) {
                (message.from_call)
            }
            div class="col-8 message-text" { (message.message_text) }
        }
    }
}

/// One entry in a channel's active-user column.
pub fn user_row(callsign: &str) -> Markup {
    html! {
        div class="row" {
            div class="col-12" { (callsign) }
        }
    }
}

/// The tab button for one channel, badge included. The badge keeps its
/// count in the text even while hidden; visibility tracks the unread
/// count.
pub fn channel_tab(tab: &ChannelTab) -> Markup {
    let button_class = if tab.is_active {
        "nav-link position-relative active"
    } else {
        "nav-link position-relative"
    };
    let badge_class = if tab.badge_visible() {
        "badge rounded-pill bg-danger tab-notify"
    } else {
        "badge rounded-pill bg-danger tab-notify visually-hidden"
    };
    html! {
        li class="nav-item" role="presentation" channel=(tab.slug) id=(tab.ids.tab_item) {
            button id=(tab.ids.tab) class=(button_class) channel=(tab.slug)
                type="button" role="tab"
                data-bs-toggle="tab" data-bs-target=(format!("#{}", tab.ids.content))
                data-select-url=(format!("/channels/{}/select", tab.slug))
                aria-controls=(tab.slug) aria-selected=(tab.is_active.to_string()) {
                (tab.label()) "\u{a0}\u{a0}"
                span id=(tab.ids.badge) class=(badge_class) { (tab.unread) }
            }
        }
    }
}

/// The content pane paired with a channel's tab: messages column on the
/// left (8/10), users column on the right (2/10).
pub fn channel_pane(tab: &ChannelTab) -> Markup {
    let pane_class = if tab.is_active {
        "tab-pane fade show active"
    } else {
        "tab-pane fade"
    };
    html! {
        div class=(pane_class) id=(tab.ids.content) role="tabpanel" aria-labelledby=(tab.ids.tab) {
            div class="container text-center channel-frame" {
                div class="row align-items-start" {
                    div class="col-10 channel-messages" id=(tab.ids.messages) {
                        @for message in &tab.channel.messages {
                            (message_row(message))
                        }
                    }
                    div class="col-2 channel-users" id=(tab.ids.users) {
                        div class="row align-items-start" {
                            div class="col-12 users-heading" { "Active Users" }
                        }
                        @for user in &tab.channel.users {
                            (user_row(user))
                        }
                    }
                }
            }
        }
    }
}

/// The APRS-IS connection line. When the gateway ships its own fragment it
/// is trusted verbatim (the stats contract declares it markup-safe);
/// otherwise the link is built, escaped, from the server name.
pub fn connection_fragment(summary: &StatsSummary) -> Markup {
    match &summary.connection_html {
        Some(fragment) => PreEscaped(fragment.clone()),
        None => html! {
            "APRS-IS Server: "
            a href="http://status.aprs2.net" { (summary.aprs_server) }
        },
    }
}

/// The full dashboard page: summary header, tab list, content panes, and
/// the pretty-printed raw stats block.
pub fn dashboard_page(board: &ChannelBoard, summary: &StatsSummary, stats: &Value) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "wavechat" }
            }
            body {
                header class="container-fluid" {
                    h1 { "wavechat" }
                    div class="row gateway-summary" {
                        span id="version" { (summary.repeat_version) }
                        span id="aprsd_version" { (summary.aprsd_version) }
                        span id="aprs_connection" { (connection_fragment(summary)) }
                        span id="uptime" { (uptime_line(summary)) }
                    }
                }
                main id="wc-content" {
                    ul class="nav nav-tabs" id="msgsTabList" role="tablist" {
                        @for tab in board.tabs() {
                            (channel_tab(tab))
                        }
                    }
                    div class="tab-content" id="msgsTabContent" {
                        @for tab in board.tabs() {
                            (channel_pane(tab))
                        }
                    }
                }
                footer class="container-fluid" {
                    pre id="jsonstats" { (pretty_stats(stats)) }
                }
            }
        }
    }
}

fn uptime_line(summary: &StatsSummary) -> String {
    match &summary.uptime {
        Some(uptime) => format!("uptime: {uptime}"),
        None => String::new(),
    }
}

fn format_timestamp(timestamp: i64) -> String {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|datetime| datetime.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
