use std::io::Write;

use chrono::{DateTime, Local, TimeZone};
use indexmap::IndexMap;

use crate::config::ReportConfig;
use crate::error::{DataError, RenderError};
use crate::models::{ServiceList, ServiceRecord, StatusCode};

const MAIL_FROM: &str = "Nagios Weekly Reporter <nagios@chalmers.it>";
const MAIL_REPLY_TO: &str = "no-reply@chalmers.it";

const HTML_HEADER: &str = "<html lang=\"en\">\n\
<head>\n\
\x20   <meta charset=\"utf-8\">\n\
\x20   <title>Weekly Nagios status report</title>\n\
</head>\n\
<body>\n\
\n";

const HTML_FOOTER: &str = "</body>\n</html>";

/// Write the whole report (optional mail headers, then the HTML body).
/// `now` is passed in so output is reproducible under test; production
/// callers pass `Local::now()`.
pub fn write_report<W: Write>(
    config: &ReportConfig,
    services: &ServiceList,
    now: DateTime<Local>,
    out: &mut W,
) -> Result<(), RenderError> {
    if config.mail_header {
        write_mail_header(config, now, out)?;
    }
    write_html(services, now, out)
}

fn write_mail_header<W: Write>(
    config: &ReportConfig,
    now: DateTime<Local>,
    out: &mut W,
) -> Result<(), RenderError> {
    writeln!(out, "From: {MAIL_FROM}")?;
    writeln!(out, "To: {}", config.recipient)?;
    writeln!(out, "Reply-To: {MAIL_REPLY_TO}")?;
    writeln!(out, "MIME-Version: 1.0")?;
    writeln!(out, "Subject: Week {} status report", now.format("%W"))?;
    writeln!(out, "Content-Type: text/html; charset=utf-8")?;
    // Blank line separating headers from body, as mail transport expects.
    writeln!(out)?;
    Ok(())
}

fn write_html<W: Write>(
    services: &ServiceList,
    now: DateTime<Local>,
    out: &mut W,
) -> Result<(), RenderError> {
    out.write_all(HTML_HEADER.as_bytes())?;
    writeln!(out, "<h2>Nagios status report week {}</h2>", now.format("%W"))?;
    writeln!(out, "<h3>Generated on {}</h3>", now.format("%d %b %Y %H:%M:%S"))?;
    writeln!(out, "<table border=1>")?;
    writeln!(
        out,
        "<tr>\n\t<th>Host</th><th style='width:100px'>Service</th>\
         <th>Status</th><th>Last check</th>\
         <th>Status information</th>\n</tr>"
    )?;
    for (host, checks) in services {
        write_host_rows(host, checks, out)?;
    }
    writeln!(out, "</table>")?;
    writeln!(out, "{HTML_FOOTER}")?;
    Ok(())
}

/// One table row per service. The host name is printed only in the
/// host's first row; later rows get an empty cell so services group
/// visually under their host.
fn write_host_rows<W: Write>(
    host: &str,
    checks: &IndexMap<String, ServiceRecord>,
    out: &mut W,
) -> Result<(), RenderError> {
    for (i, (service, record)) in checks.iter().enumerate() {
        let status = StatusCode::from_wire(record.status)?;
        if i == 0 {
            writeln!(out, "\t<tr><td>{host}</td>")?;
        } else {
            writeln!(out, "\t<tr><td></td>")?;
        }
        writeln!(out, "\t\t<td>{service}</td>")?;
        writeln!(
            out,
            "\t\t<td style='background-color:{}'>{}</td>",
            status.bgcolor(),
            status.label()
        )?;
        writeln!(out, "\t\t<td>{}</td>", format_last_check(record.last_check)?)?;
        // Plugin output is trusted opaque text; emitted verbatim, no
        // HTML escaping, inside <pre> so embedded whitespace survives.
        writeln!(out, "\t\t<td><pre>{}</pre></td>", record.plugin_output)?;
        writeln!(out, "\t</tr>")?;
    }
    Ok(())
}

fn format_last_check(millis: i64) -> Result<String, DataError> {
    let when = Local
        .timestamp_millis_opt(millis)
        .earliest()
        .ok_or(DataError::BadTimestamp(millis))?;
    Ok(when.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode_status;
    use crate::config::Args;
    use clap::Parser;

    fn config(argv: &[&str]) -> ReportConfig {
        ReportConfig::resolve(Args::try_parse_from(argv).unwrap()).unwrap()
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 11, 18, 9, 30, 0).unwrap()
    }

    fn sample_services() -> ServiceList {
        decode_status(
            r#"{
            "data": {
                "servicelist": {
                    "H1": {
                        "s1": {"status": 2, "last_check": 1700000000000,
                               "plugin_output": "OK - load average: 0.1"},
                        "s2": {"status": 16, "last_check": 1700000000000,
                               "plugin_output": "CRITICAL - disk full"}
                    },
                    "H2": {
                        "s3": {"status": 4, "last_check": 1700000000000,
                               "plugin_output": "WARNING"}
                    }
                }
            }
        }"#,
        )
        .unwrap()
    }

    fn render_to_string(config: &ReportConfig, services: &ServiceList) -> String {
        let mut buf = Vec::new();
        write_report(config, services, fixed_now(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn hosts_are_printed_once_per_group() {
        let config = config(&["nrg", "-p", "x", "-d"]);
        let output = render_to_string(&config, &sample_services());

        let data_rows: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("\t<tr>"))
            .collect();
        assert_eq!(data_rows.len(), 3);
        assert_eq!(data_rows[0], "\t<tr><td>H1</td>");
        assert_eq!(data_rows[1], "\t<tr><td></td>");
        assert_eq!(data_rows[2], "\t<tr><td>H2</td>");
        assert_eq!(output.matches("<td>H1</td>").count(), 1);
    }

    #[test]
    fn status_cells_carry_label_and_color() {
        let config = config(&["nrg", "-p", "x", "-d"]);
        let output = render_to_string(&config, &sample_services());

        assert!(output.contains("<td style='background-color:#2BE043'>OK</td>"));
        assert!(output.contains("<td style='background-color:#E34040'>Critical</td>"));
        assert!(output.contains("<td style='background-color:#F2ED4E'>Warning</td>"));
    }

    #[test]
    fn last_check_is_local_time_of_epoch_seconds() {
        let expected = Local
            .timestamp_opt(1_700_000_000, 0)
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(format_last_check(1_700_000_000_000).unwrap(), expected);
    }

    #[test]
    fn unknown_status_code_fails_the_render() {
        let config = config(&["nrg", "-p", "x", "-d"]);
        let services = decode_status(
            r#"{"data": {"servicelist": {
                "H1": {"s1": {"status": 3, "last_check": 0, "plugin_output": ""}}
            }}}"#,
        )
        .unwrap();

        let mut buf = Vec::new();
        let err = write_report(&config, &services, fixed_now(), &mut buf).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Data(DataError::UnknownStatusCode(3))
        ));
    }

    #[test]
    fn disabled_mail_header_starts_with_html() {
        let config = config(&["nrg", "-p", "x", "-d"]);
        let output = render_to_string(&config, &sample_services());
        assert!(output.starts_with("<html lang=\"en\">"));
        // Blank line after <body>, as the legacy output had.
        assert!(output.contains("<body>\n\n<h2>"));
    }

    #[test]
    fn mail_header_block_precedes_body() {
        let config = config(&["nrg", "-p", "x", "-r", "ops@example.org"]);
        let output = render_to_string(&config, &sample_services());

        assert!(output.starts_with("From: Nagios Weekly Reporter <nagios@chalmers.it>\n"));
        assert!(output.contains("To: ops@example.org\n"));
        assert!(output.contains("MIME-Version: 1.0\n"));
        assert!(output.contains("Content-Type: text/html; charset=utf-8\n"));
        // Exactly one blank line between the header block and the body.
        assert!(output.contains("charset=utf-8\n\n<html lang=\"en\">"));
    }

    #[test]
    fn subject_contains_week_number() {
        let config = config(&["nrg", "-p", "x"]);
        let output = render_to_string(&config, &sample_services());
        let week = fixed_now().format("%W").to_string();
        assert!(output.contains(&format!("Subject: Week {week} status report")));
        assert!(output.contains(&format!("<h2>Nagios status report week {week}</h2>")));
    }

    #[test]
    fn plugin_output_is_not_escaped() {
        let config = config(&["nrg", "-p", "x", "-d"]);
        let services = decode_status(
            r#"{"data": {"servicelist": {
                "H1": {"s1": {"status": 2, "last_check": 0,
                              "plugin_output": "load <ok>\nline two"}}
            }}}"#,
        )
        .unwrap();
        let output = render_to_string(&config, &services);
        assert!(output.contains("<pre>load <ok>\nline two</pre>"));
    }

    #[test]
    fn rendering_is_deterministic_for_a_fixed_clock() {
        let config = config(&["nrg", "-p", "x"]);
        let services = sample_services();
        let first = render_to_string(&config, &services);
        let second = render_to_string(&config, &services);
        assert_eq!(first, second);
    }
}
