//! quaggaboot.sh: the script the lifecycle manager runs once per daemon
//! (`sh quaggaboot.sh <daemon>`) and once more for vtysh.
//!
//! Every daemon but zebra waits for zebra's readiness file before starting;
//! the vtysh apply step waits for zebra plus every daemon with a router block
//! in Quagga.conf. Waiting is a bounded poll on `$QUAGGA_STATE_DIR/<f>.vty`.
//!
//! The function and variable names are the interface the lifecycle manager
//! knows; keep them stable.

use crate::render::waitset::{
    PIM_DAEMON, PIM_ROUTER_PATTERN, PIM6_ROUTER_PATTERN, ROUTER_DAEMONS, vty_file,
};
use crate::service::MASTER;
use crate::service::zebra::VTYSH;
use crate::spec::session::{DEFAULT_BIN_SEARCH, DEFAULT_SBIN_SEARCH};

/// Directories searched for the vtysh binary (`bin`) and daemons (`sbin`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    pub sbin: Vec<String>,
    pub bin: Vec<String>,
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self {
            sbin: DEFAULT_SBIN_SEARCH.iter().map(|s| s.to_string()).collect(),
            bin: DEFAULT_BIN_SEARCH.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// User and group the daemons drop privileges to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub group: String,
}

/// Wait-barrier budget: the readiness file is checked `attempts` times,
/// sleeping `interval_ms` between checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub attempts: u32,
    pub interval_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootParams {
    pub conf_path: String,
    pub search: SearchPaths,
    pub state_dir: String,
    pub identity: Identity,
    pub wait: WaitPolicy,
}

/// Render the boot script.
///
/// Important: we avoid `format!()` because the script is full of `$`, `{`
/// and `}`; placeholders are substituted in a single left-to-right pass so a
/// value can never be mistaken for a later placeholder.
pub fn synthesize(params: &BootParams) -> String {
    const TEMPLATE: &str = r#"#!/bin/sh
# auto-generated by zebra service (quagga-compose)
QUAGGA_CONF=__QUAGGA_CONF__
QUAGGA_SBIN_SEARCH="__SBIN_SEARCH__"
QUAGGA_BIN_SEARCH="__BIN_SEARCH__"
QUAGGA_STATE_DIR=__STATE_DIR__
QUAGGA_USER=__USER__
QUAGGA_GROUP=__GROUP__

searchforprog()
{
    prog=$1
    shift
    ret=
    for p in "$@"; do
        if [ -x "$p/$prog" ]; then
            ret=$p
            break
        fi
    done
    echo $ret
}

confcheck()
{
    CONF_DIR=`dirname "$QUAGGA_CONF"`
    # if /etc/quagga exists, point /etc/quagga/Quagga.conf -> CONF_DIR
    if [ "$CONF_DIR" != "/etc/quagga" ] && [ -d /etc/quagga ] && [ ! -e /etc/quagga/Quagga.conf ]; then
        ln -s "$CONF_DIR/Quagga.conf" /etc/quagga/Quagga.conf
    fi
    # if /etc/quagga exists, point /etc/quagga/vtysh.conf -> CONF_DIR
    if [ "$CONF_DIR" != "/etc/quagga" ] && [ -d /etc/quagga ] && [ ! -e /etc/quagga/vtysh.conf ]; then
        ln -s "$CONF_DIR/vtysh.conf" /etc/quagga/vtysh.conf
    fi
}

waitforvtyfiles()
{
    for f in "$@"; do
        count=1
        until [ -e "$QUAGGA_STATE_DIR/$f" ]; do
            if [ $count -eq __WAIT_ATTEMPTS__ ]; then
                echo "ERROR: vty file not found: $QUAGGA_STATE_DIR/$f" >&2
                return 1
            fi
            sleep __WAIT_INTERVAL__
            count=$(($count + 1))
        done
    done
}

bootdaemon()
{
    QUAGGA_SBIN_DIR=$(searchforprog $1 $QUAGGA_SBIN_SEARCH)
    if [ "z$QUAGGA_SBIN_DIR" = "z" ]; then
        echo "ERROR: Quagga's '$1' daemon not found in search path:" >&2
        echo "  $QUAGGA_SBIN_SEARCH" >&2
        return 1
    fi

    flags=""

    if [ "$1" != "__MASTER__" ]; then
        waitforvtyfiles __MASTER_VTY__ || return 1
    fi

    if [ "$1" = "__PIM_DAEMON__" ] && \
        grep -E -q '__PIM6_PATTERN__' "$QUAGGA_CONF"; then
        flags="$flags -6"
    fi

    "$QUAGGA_SBIN_DIR/$1" $flags -u "$QUAGGA_USER" -g "$QUAGGA_GROUP" -d
}

bootvtysh()
{
    QUAGGA_BIN_DIR=$(searchforprog $1 $QUAGGA_BIN_SEARCH)
    if [ "z$QUAGGA_BIN_DIR" = "z" ]; then
        echo "ERROR: Quagga's '$1' program not found in search path:" >&2
        echo "  $QUAGGA_BIN_SEARCH" >&2
        return 1
    fi

    vtyfiles="__MASTER_VTY__"
    for r in __ROUTER_DAEMONS__; do
        if grep -q "^router \<${r}\>" "$QUAGGA_CONF"; then
            vtyfiles="$vtyfiles ${r}d.vty"
        fi
    done

    if grep -E -q '__PIM_PATTERN__' "$QUAGGA_CONF"; then
        vtyfiles="$vtyfiles __PIM_VTY__"
    fi

    # wait for Quagga daemon vty files to appear before invoking vtysh
    waitforvtyfiles $vtyfiles || return 1

    "$QUAGGA_BIN_DIR/__VTYSH__" -b
}

confcheck
if [ "x$1" = "x" ]; then
    echo "ERROR: missing the name of the Quagga daemon to boot" >&2
    exit 1
elif [ "$1" = "__VTYSH__" ]; then
    bootvtysh $1
else
    bootdaemon $1
fi
"#;

    let substitutions: [(&str, String); 16] = [
        ("__QUAGGA_CONF__", shell_quote(&params.conf_path)),
        ("__SBIN_SEARCH__", params.search.sbin.join(" ")),
        ("__BIN_SEARCH__", params.search.bin.join(" ")),
        ("__STATE_DIR__", shell_quote(&params.state_dir)),
        ("__USER__", shell_quote(&params.identity.user)),
        ("__GROUP__", shell_quote(&params.identity.group)),
        ("__WAIT_ATTEMPTS__", params.wait.attempts.to_string()),
        ("__WAIT_INTERVAL__", seconds(params.wait.interval_ms)),
        ("__MASTER_VTY__", vty_file(MASTER)),
        ("__MASTER__", MASTER.to_string()),
        ("__PIM_DAEMON__", PIM_DAEMON.to_string()),
        ("__PIM6_PATTERN__", PIM6_ROUTER_PATTERN.to_string()),
        ("__PIM_PATTERN__", PIM_ROUTER_PATTERN.to_string()),
        ("__PIM_VTY__", vty_file(PIM_DAEMON)),
        ("__ROUTER_DAEMONS__", ROUTER_DAEMONS.join(" ")),
        ("__VTYSH__", VTYSH.to_string()),
    ];

    let script = fill(TEMPLATE, &substitutions);

    tracing::debug!(
        conf = %params.conf_path,
        state_dir = %params.state_dir,
        bytes = script.len(),
        "rendered boot script"
    );
    script
}

/// Replace every `__NAME__` placeholder in one pass over `template`.
/// Substituted text is never rescanned.
fn fill(template: &str, substitutions: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find("__") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match substitutions
            .iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push_str("__");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Single-quote a value for a shell assignment: `it's` => `'it'\''s'`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Milliseconds as a `sleep` argument: 100 => "0.1", 2000 => "2".
fn seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:03}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
