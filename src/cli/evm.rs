// src/cli/evm.rs — `orion evm`: earned value calculator

use crate::metrics::format::{format_currency, format_index};
use crate::metrics::{EvmInputs, EvmSnapshot};

pub fn run_evm(inputs: EvmInputs, json: bool) -> anyhow::Result<()> {
    let EvmInputs { bac, ev, ac, pv } = inputs;
    if [bac, pv, ev, ac].iter().any(|v| !v.is_finite() || *v < 0.0) {
        anyhow::bail!("BAC, PV, EV and AC must be non-negative numbers");
    }
    let snap = EvmSnapshot::compute(inputs);

    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    print!("{}", render(&snap));
    Ok(())
}

fn render(s: &EvmSnapshot) -> String {
    let rows = [
        ("BAC", format_currency(s.bac)),
        ("PV", format_currency(s.pv)),
        ("EV", format_currency(s.ev)),
        ("AC", format_currency(s.ac)),
        ("SV", format_currency(s.sv)),
        ("CV", format_currency(s.cv)),
        ("SPI", format_index(s.spi)),
        ("CPI", format_index(s.cpi)),
        ("TCPI", format_index(s.tcpi)),
        ("EAC", format_currency(s.eac)),
        ("ETC", format_currency(s.etc)),
        ("VAC", format_currency(s.vac)),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("  {label:<5} {value:>10}\n"));
    }
    out.push_str(&format!(
        "\n  Health {} ({}/100)\n",
        s.status.label(),
        s.health_score
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_forecasts() {
        let snap = EvmSnapshot::compute(EvmInputs {
            bac: 1_000_000.0,
            ev: 450_000.0,
            ac: 500_000.0,
            pv: 500_000.0,
        });
        let text = render(&snap);
        assert!(text.contains("SPI"));
        assert!(text.contains("0.90"));
        assert!(text.contains("$1.1M"));
        assert!(text.contains("Critical") || text.contains("At Risk"));
    }

    #[test]
    fn test_rejects_negative_input() {
        let inputs = EvmInputs {
            bac: -1.0,
            ev: 0.0,
            ac: 0.0,
            pv: 0.0,
        };
        assert!(run_evm(inputs, false).is_err());
    }
}
