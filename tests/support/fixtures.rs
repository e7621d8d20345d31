//! Markup captured from the aMule 2.3.x web interface, trimmed to the parts
//! the parsers look at.

/// Footer frame carrying the daemon version.
pub const FOOTER_233: &str = r#"<html><head><title>aMule control panel</title></head>
<body><table><tr><td class="footer">aMule 2.3.3 Web Server</td></tr></table>
<form action="footer.php" method="post"><input type="text" name="ed2klink">
<select name="selectcat"><option value="all">all</option></select>
<input type="submit" name="Submit" value="Download link"></form></body></html>"#;

/// Statistics frame.
pub const STATS_PAGE: &str = r#"<html><body>
<table><tr><td>
Ed2k : Connected</td></tr>
<tr><td>Kad : Firewalled
</td></tr></table>
<table><tr><td>Download: 15.5 kb/s</td></tr></table>
</body></html>"#;

/// Log page.
pub const LOG_PAGE: &str = "<html><body><pre>2024-01-01 12:00:00: Connected to server\n2024-01-01 12:00:05: Kad firewalled</pre></body></html>";

/// A download list row. `speed` may be empty for paused files.
pub fn download_row(id: &str, name: &str, completed: &str, speed: &str) -> String {
    format!(
        r#"<tr><td><input type="checkbox" name="{id}"></td><td>{name}</td><td>700.00 MB</td><td>{completed}</td><td>{speed}</td><td><img src="dyn_{id}.png" height="20" width="100"></td><td>3 ( 5 )</td><td>Downloading</td><td>Normal</td></tr>"#
    )
}

/// An upload list row with the two padded gap columns.
pub fn upload_row(file: &str, user: &str, speed: &str) -> String {
    format!(
        "<tr><td>{file}</td><td>{user}</td><td>10.5 MB</td><td>1.2 MB</td><td>&nbsp;</td><td>&nbsp;</td><td>{speed}</td></tr>"
    )
}

/// A download page: six layout tables, the download list, a separator
/// table, then the upload list.
pub fn download_page(download_rows: &str, upload_rows: &str) -> String {
    let layout = r#"<table><tr><td><a href="amuleweb-main-dload.php">Downloads</a></td></tr></table>"#.repeat(6);
    format!(
        r#"<html><head><title>aMule control panel</title></head><body>{layout}
<form action="amuleweb-main-dload.php" method="post">
<table><tr><th></th><th>File name</th><th>Size</th><th>Completed</th><th>Speed</th><th>Progress</th><th>Sources</th><th>Status</th><th>Priority</th></tr>
{download_rows}
</table></form>
<table><tr><td>&nbsp;</td></tr></table>
<table><tr><th colspan="7">Uploads</th></tr><tr><th>File</th><th>User</th><th>Up</th><th>Down</th><th></th><th></th><th>Speed</th></tr>
{upload_rows}
</table></body></html>"#
    )
}

/// A server list row with remove and connect links.
pub fn server_row(ip: &str, port: &str, name: &str) -> String {
    format!(
        r#"<tr><td><a href="amuleweb-main-servers.php?cmd=remove&ip={ip}&port={port}"><img src="cancel.png"></a></td><td><a href="amuleweb-main-servers.php?cmd=connect&ip={ip}&port={port}">Connect</a></td><td>{name}</td><td>Public server</td><td>{ip}:{port}</td><td>12000</td><td>3400000</td></tr>"#
    )
}

/// A server page with one navigation table and one server table.
pub fn server_page(rows: &str) -> String {
    format!(
        r#"<html><body><table><tr><td>menu</td></tr></table>
<table><tr><th colspan="7">Server list</th></tr><tr><td colspan="7"><hr></td></tr>
<tr><th></th><th></th><th>Name</th><th>Description</th><th>Address</th><th>Users</th><th>Files</th></tr>
{rows}
</table></body></html>"#
    )
}

/// A search result row.
pub fn search_row(hash: &str, name: &str, size: &str, sources: &str) -> String {
    format!(
        r#"<tr><td><input type="checkbox" name="{hash}"></td><td>{name}</td><td>{size}</td><td>{sources}</td></tr>"#
    )
}

/// A search results page.
pub fn search_page(rows: &str) -> String {
    format!(
        r#"<html><body><form action="amuleweb-main-search.php" method="post">
<table><tr><td><input type="text" name="searchval"></td></tr></table>
<table><tr><th></th><th>File Name</th><th>Size</th><th>Sources</th></tr>
{rows}
</table></form></body></html>"#
    )
}

/// Preferences page with the settings script.
pub const PREFS_PAGE: &str = r#"<html><head>
<script language="JavaScript" type="text/JavaScript">
function formCommandSubmit(command) { document.mainform.command.value = command; }
</script>
<script>
var initvals = new Object;
initvals["autorefresh_time"] = "120";
initvals["use_gzip"] = "1";
initvals["max_line_down_cap"] = "300";
initvals["max_line_up_cap"] = "100";
initvals["max_down_limit"] = "200";
initvals["max_up_limit"] = "10";
initvals["slot_alloc"] = "2";
initvals["check_free_space"] = "1";
initvals["min_free_space"] = "1";
initvals["new_files_auto_dl_prio"] = "1";
initvals["new_files_auto_ul_prio"] = "0";
initvals["ich_en"] = "1";
initvals["aich_trust"] = "0";
initvals["max_conn_total"] = "500";
initvals["max_file_src"] = "300";
initvals["autoconn_en"] = "1";
initvals["reconn_en"] = "1";
initvals["tcp_port"] = "4662";
initvals["udp_port"] = "4672";
initvals["udp_dis"] = "0";
initvals["new_files_paused"] = "0";
initvals["preview_prio"] = "1";
<!--
function init_data() {
	initvals["tcp_port"] = "1";
}
-->
</script></head><body><form name="mainform"></form></body></html>"#;
