//! Fixture pages with realistic card markup.
//!
//! The markup mirrors what the firmware of each card family actually serves:
//! terse, table-heavy HTML with the configuration rendered as form field
//! values.

fn select(name: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!("<select name=\"{name}\">");
    for option in options {
        if *option == selected {
            html.push_str(&format!("<option value=\"{option}\" selected>{option}</option>"));
        } else {
            html.push_str(&format!("<option value=\"{option}\">{option}</option>"));
        }
    }
    html.push_str("</select>");
    html
}

fn input(name: &str, value: &str) -> String {
    format!("<input type=\"text\" name=\"{name}\" value=\"{value}\">")
}

// ============================================================================
// Socomec NetVision (Netys)
// ============================================================================

/// Login page carrying the per-session challenge token.
pub fn netvision_login_page(challenge: &str) -> String {
    format!(
        "<html><body><form action=\"/tgi/login.tgi\" method=\"post\">\
         <input type=\"text\" name=\"Username\" value=\"\">\
         <input type=\"password\" name=\"Password\" value=\"\">\
         <input type=\"hidden\" name=\"Challenge\" value=\"{challenge}\">\
         <input type=\"hidden\" name=\"Response\" value=\"\">\
         </form></body></html>"
    )
}

/// Login page missing the challenge input entirely.
pub fn netvision_login_page_no_challenge() -> String {
    "<html><body><form action=\"/tgi/login.tgi\" method=\"post\">\
     <input type=\"text\" name=\"Username\" value=\"\">\
     <input type=\"password\" name=\"Password\" value=\"\">\
     </form></body></html>"
        .to_string()
}

/// SNMP access page: `CO1`/`PE1` hold the catch-all entry, raw fields `2..8`
/// hold the numbered client entries.
pub fn netvision_access_page() -> String {
    let mut page = String::from("<html><body><form>");
    page.push_str(&input("CO1", "public"));
    page.push_str(&select("PE1", &["none", "ro", "rw"], "none"));

    let rows: [(&str, &str, &str); 7] = [
        ("010.008.007.006", "public", "ro"),
        ("10.66.66.66", "secret1", "rw"),
        ("0.0.0.0", "public", "none"),
        ("0.0.0.0", "public", "none"),
        ("0.0.0.0", "public", "none"),
        ("0.0.0.0", "public", "none"),
        ("0.0.0.0", "public", "none"),
    ];
    for (i, (ip, community, access)) in rows.iter().enumerate() {
        let nr = i + 2;
        page.push_str(&input(&format!("NM{nr}"), ip));
        page.push_str(&input(&format!("CO{nr}"), community));
        page.push_str(&select(&format!("PE{nr}"), &["none", "ro", "rw"], access));
    }
    page.push_str("</form></body></html>");
    page
}

/// Trap receiver page, flat slots `1..8`. The first receiver's severity
/// token is parameterized so tests can feed unknown tokens through decode.
pub fn netvision_trap_page(per1: &str) -> String {
    let mut page = String::from("<html><body><form>");
    for nr in 1..=8 {
        let (ip, per) = if nr == 1 {
            ("10.6.8.7", per1)
        } else {
            ("0.0.0.0", "non")
        };
        page.push_str(&input(&format!("NMS{nr}"), ip));
        page.push_str(&input(&format!("COM{nr}"), "public"));
        // The PER select on the card offers the vendor tokens; an unknown
        // token is modeled as a selected option outside that set.
        let mut options = vec!["non", "inf", "war", "sec"];
        if !options.contains(&per) {
            options.push(per);
        }
        page.push_str(&select(&format!("PER{nr}"), &options, per));
        page.push_str(&select(&format!("TTT{nr}"), &["0", "1"], "1"));
        page.push_str(&select(&format!("TYP{nr}"), &["v4", "rfc"], "rfc"));
    }
    page.push_str("</form></body></html>");
    page
}

/// Identity page with the label/value table.
pub fn netvision_info_page() -> String {
    "<html><body><table>\
     <tr><td>Model:</td><td>NETYS RT 1/1 UPS</td></tr>\
     <tr><td>Serial Number:</td><td>123456789</td></tr>\
     <tr><td>UPS Firmware:</td><td>1.0</td></tr>\
     <tr><td>Web Firmware:</td><td>2.0h</td></tr>\
     <tr><td>Rating VA:</td><td>2200 VA</td></tr>\
     </table></body></html>"
        .to_string()
}

// ============================================================================
// Socomec Masterys
// ============================================================================

/// Monitoring page used as the basic-auth login probe.
pub fn masterys_probe_page() -> String {
    "<html><body><table><tr><td>Comprehensive view</td></tr></table></body></html>".to_string()
}

/// SNMP access page, letters `B..I`; letter `I` is the catch-all.
pub fn masterys_access_page() -> String {
    let mut page = String::from("<html><body><form>");
    let rows: [(&str, &str, &str); 8] = [
        ("10.8.7.6", "public", "1"),
        ("10.66.66.66", "secret1", "2"),
        ("", "public", "3"),
        ("", "public", "3"),
        ("", "public", "3"),
        ("", "public", "3"),
        ("", "public", "3"),
        ("", "masterpub", "1"),
    ];
    for (i, (ip, community, access)) in rows.iter().enumerate() {
        let letter = (b'B' + i as u8) as char;
        page.push_str(&input(&format!("XAAAAAAA{letter}AADE"), ip));
        page.push_str(&input(&format!("XAAAAAAA{letter}AADF"), community));
        page.push_str(&select(
            &format!("XAAAAAAA{letter}AADG"),
            &["1", "2", "3"],
            access,
        ));
    }
    page.push_str("</form></body></html>");
    page
}

/// Trap receiver page, letters `B..I`, flat slots `1..8` with the combined
/// severity/MIB selector.
pub fn masterys_trap_page() -> String {
    let mut page = String::from("<html><body><form>");
    let rows: [(&str, &str, &str); 8] = [
        ("10.6.8.7", "3", "nms.example.com"),
        ("10.9.9.9", "2", ""),
        ("", "1", ""),
        ("", "1", ""),
        ("", "1", ""),
        ("", "1", ""),
        ("", "1", ""),
        ("", "1", ""),
    ];
    for (i, (ip, combined, alias)) in rows.iter().enumerate() {
        let letter = (b'B' + i as u8) as char;
        page.push_str(&input(&format!("XAAAAAAA{letter}AAFE"), ip));
        page.push_str(&input(&format!("XAAAAAAA{letter}AAFF"), "public"));
        page.push_str(&select(
            &format!("XAAAAAAA{letter}AAFJ"),
            &["1", "2", "3"],
            combined,
        ));
        page.push_str(&input(&format!("XAAAAAAA{letter}AAFG"), alias));
    }
    page.push_str("</form></body></html>");
    page
}

/// Identification page with values nested in layout tables.
pub fn masterys_info_page() -> String {
    fn row(label: &str, value: &str) -> String {
        format!(
            "<tr><td><b>{label}</b></td>\
             <td><table><tr><td><span>{value}</span></td></tr></table></td></tr>"
        )
    }
    let mut page = String::from("<html><body><table>");
    page.push_str(&row("UPS Model", "MASTERYS 3/3"));
    page.push_str(&row("UPS Serial Number", "876543"));
    page.push_str(&row("UPS Firmware Release", "1.7"));
    page.push_str(&row("UPS Agent Version", "v2.0h (SN D1111)"));
    page.push_str("</table></body></html>");
    page
}

// ============================================================================
// Riello Netman 204
// ============================================================================

/// Combined SNMP/trap configuration page. Inputs carry both `id` and `name`
/// as the firmware renders them.
pub fn netman_snmp_page() -> String {
    fn field(name: &str, value: &str) -> String {
        format!("<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">")
    }
    let mut page = String::from(
        "<html><body><form action=\"/cgi-bin/snmp_config_w.cgi\" method=\"post\">\
         <input type=\"checkbox\" name=\"enable_snmp\" checked>",
    );
    page.push_str(&field("snmp_cconfig0", "public"));
    page.push_str(&field("snmp_cconfig1", "writepass"));
    page.push_str(&field("snmp_cconfig2", "trapcomm"));
    page.push_str(&field("snmp_sysC", "admin@example.com"));
    page.push_str(&field("snmp_sysN", "ups-01"));
    page.push_str(&field("snmp_sysL", "server room"));
    page.push_str(&field("session", "SESS42"));
    let receivers = ["10.6.8.7", "10.9.9.9", "", "", "", "", ""];
    for (i, ip) in receivers.iter().enumerate() {
        page.push_str(&field(&format!("snmp_config{i}"), ip));
    }
    page.push_str("</form></body></html>");
    page
}

/// About page with the label/value table.
pub fn netman_about_page() -> String {
    "<html><body><table>\
     <tr><td>Model</td><td>SENTINEL PRO</td></tr>\
     <tr><td>Identification number</td><td>SN998877</td></tr>\
     <tr><td>Firmware version</td><td>01.02.003</td></tr>\
     <tr><td>Application version</td><td>2.05</td></tr>\
     <tr><td>Serial Number</td><td>D5555</td></tr>\
     <tr><td>MAC Address</td><td>00:11:22:33:44:55</td></tr>\
     <tr><td>Power [kVA]</td><td>2.2</td></tr>\
     <tr><td>Power [kW]</td><td>1.8</td></tr>\
     <tr><td>Battery capacity [Ah]</td><td>9</td></tr>\
     </table></body></html>"
        .to_string()
}
