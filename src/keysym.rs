//! Code-Point to Keysym Resolution
//!
//! Maps a Unicode code point to an X11 keysym. Three tiers, in order:
//! printable Latin-1 maps to itself, a small set of control characters
//! maps to named function keysyms, and everything else goes through the
//! legacy keysym table with the standard `0x01000000 | codepoint`
//! Unicode-keysym convention as the last resort. The server may or may
//! not honor that last form; whether a keycode exists for it is decided
//! later by the physical-key resolver.

/// X11 keysym value
pub type Keysym = u32;

/// `XK_BackSpace`
pub const XK_BACKSPACE: Keysym = 0xff08;
/// `XK_Tab`
pub const XK_TAB: Keysym = 0xff09;
/// `XK_Linefeed`
pub const XK_LINEFEED: Keysym = 0xff0a;
/// `XK_Return`
pub const XK_RETURN: Keysym = 0xff0d;
/// `XK_Escape`
pub const XK_ESCAPE: Keysym = 0xff1b;
/// `XK_Delete`
pub const XK_DELETE: Keysym = 0xffff;
/// `XK_Shift_L`
pub const XK_SHIFT_L: Keysym = 0xffe1;
/// `XK_Mode_switch` (second-group shift on legacy layouts)
pub const XK_MODE_SWITCH: Keysym = 0xff7e;
/// `XK_ISO_Level3_Shift` (AltGr on most modern layouts)
pub const XK_ISO_LEVEL3_SHIFT: Keysym = 0xfe03;

/// High-bit pattern of the "Unicode keysym" encoding convention
pub const UNICODE_KEYSYM_BASE: Keysym = 0x0100_0000;

/// Legacy keysym assignments for code points outside Latin-1.
///
/// Subset of the keysymdef.h tables: Latin-2 through Latin-4 letters,
/// the spacing accents that share those code pages, Greek, Cyrillic,
/// and common typographic punctuation. Sorted by code point for binary
/// search. Anything not listed falls through to the Unicode keysym
/// convention.
const LEGACY_KEYSYMS: &[(u32, Keysym)] = &[
    (0x0100, 0x03c0), // Amacron
    (0x0101, 0x03e0), // amacron
    (0x0102, 0x01c3), // Abreve
    (0x0103, 0x01e3), // abreve
    (0x0104, 0x01a1), // Aogonek
    (0x0105, 0x01b1), // aogonek
    (0x0106, 0x01c6), // Cacute
    (0x0107, 0x01e6), // cacute
    (0x0108, 0x02c6), // Ccircumflex
    (0x0109, 0x02e6), // ccircumflex
    (0x010a, 0x02c5), // Cabovedot
    (0x010b, 0x02e5), // cabovedot
    (0x010c, 0x01c8), // Ccaron
    (0x010d, 0x01e8), // ccaron
    (0x010e, 0x01cf), // Dcaron
    (0x010f, 0x01ef), // dcaron
    (0x0110, 0x01d0), // Dstroke
    (0x0111, 0x01f0), // dstroke
    (0x0112, 0x03aa), // Emacron
    (0x0113, 0x03ba), // emacron
    (0x0116, 0x03cc), // Eabovedot
    (0x0117, 0x03ec), // eabovedot
    (0x0118, 0x01ca), // Eogonek
    (0x0119, 0x01ea), // eogonek
    (0x011a, 0x01cc), // Ecaron
    (0x011b, 0x01ec), // ecaron
    (0x011c, 0x02d8), // Gcircumflex
    (0x011d, 0x02f8), // gcircumflex
    (0x011e, 0x02ab), // Gbreve
    (0x011f, 0x02bb), // gbreve
    (0x0120, 0x02d5), // Gabovedot
    (0x0121, 0x02f5), // gabovedot
    (0x0122, 0x03ab), // Gcedilla
    (0x0123, 0x03bb), // gcedilla
    (0x0124, 0x02a6), // Hcircumflex
    (0x0125, 0x02b6), // hcircumflex
    (0x0126, 0x02a1), // Hstroke
    (0x0127, 0x02b1), // hstroke
    (0x0128, 0x03a5), // Itilde
    (0x0129, 0x03b5), // itilde
    (0x012a, 0x03cf), // Imacron
    (0x012b, 0x03ef), // imacron
    (0x012e, 0x03c7), // Iogonek
    (0x012f, 0x03e7), // iogonek
    (0x0130, 0x02a9), // Iabovedot
    (0x0131, 0x02b9), // idotless
    (0x0134, 0x02ac), // Jcircumflex
    (0x0135, 0x02bc), // jcircumflex
    (0x0136, 0x03d3), // Kcedilla
    (0x0137, 0x03f3), // kcedilla
    (0x0138, 0x03a2), // kra
    (0x0139, 0x01c5), // Lacute
    (0x013a, 0x01e5), // lacute
    (0x013b, 0x03a6), // Lcedilla
    (0x013c, 0x03b6), // lcedilla
    (0x013d, 0x01a5), // Lcaron
    (0x013e, 0x01b5), // lcaron
    (0x0141, 0x01a3), // Lstroke
    (0x0142, 0x01b3), // lstroke
    (0x0143, 0x01d1), // Nacute
    (0x0144, 0x01f1), // nacute
    (0x0145, 0x03d1), // Ncedilla
    (0x0146, 0x03f1), // ncedilla
    (0x0147, 0x01d2), // Ncaron
    (0x0148, 0x01f2), // ncaron
    (0x014a, 0x03bd), // ENG
    (0x014b, 0x03bf), // eng
    (0x014c, 0x03d2), // Omacron
    (0x014d, 0x03f2), // omacron
    (0x0150, 0x01d5), // Odoubleacute
    (0x0151, 0x01f5), // odoubleacute
    (0x0154, 0x01c0), // Racute
    (0x0155, 0x01e0), // racute
    (0x0156, 0x03a3), // Rcedilla
    (0x0157, 0x03b3), // rcedilla
    (0x0158, 0x01d8), // Rcaron
    (0x0159, 0x01f8), // rcaron
    (0x015a, 0x01a6), // Sacute
    (0x015b, 0x01b6), // sacute
    (0x015c, 0x02de), // Scircumflex
    (0x015d, 0x02fe), // scircumflex
    (0x015e, 0x01aa), // Scedilla
    (0x015f, 0x01ba), // scedilla
    (0x0160, 0x01a9), // Scaron
    (0x0161, 0x01b9), // scaron
    (0x0162, 0x01de), // Tcedilla
    (0x0163, 0x01fe), // tcedilla
    (0x0164, 0x01ab), // Tcaron
    (0x0165, 0x01bb), // tcaron
    (0x0166, 0x03ac), // Tslash
    (0x0167, 0x03bc), // tslash
    (0x0168, 0x03dd), // Utilde
    (0x0169, 0x03fd), // utilde
    (0x016a, 0x03de), // Umacron
    (0x016b, 0x03fe), // umacron
    (0x016c, 0x02dd), // Ubreve
    (0x016d, 0x02fd), // ubreve
    (0x016e, 0x01d9), // Uring
    (0x016f, 0x01f9), // uring
    (0x0170, 0x01db), // Udoubleacute
    (0x0171, 0x01fb), // udoubleacute
    (0x0172, 0x03d9), // Uogonek
    (0x0173, 0x03f9), // uogonek
    (0x0179, 0x01ac), // Zacute
    (0x017a, 0x01bc), // zacute
    (0x017b, 0x01af), // Zabovedot
    (0x017c, 0x01bf), // zabovedot
    (0x017d, 0x01ae), // Zcaron
    (0x017e, 0x01be), // zcaron
    (0x02c7, 0x01b7), // caron
    (0x02d8, 0x01a2), // breve
    (0x02d9, 0x01ff), // abovedot
    (0x02db, 0x01b2), // ogonek
    (0x02dd, 0x01bd), // doubleacute
    (0x0385, 0x07ae), // Greek_accentdieresis
    (0x0386, 0x07a1), // Greek_ALPHAaccent
    (0x0388, 0x07a2), // Greek_EPSILONaccent
    (0x0389, 0x07a3), // Greek_ETAaccent
    (0x038a, 0x07a4), // Greek_IOTAaccent
    (0x038c, 0x07a7), // Greek_OMICRONaccent
    (0x038e, 0x07a8), // Greek_UPSILONaccent
    (0x038f, 0x07ab), // Greek_OMEGAaccent
    (0x0390, 0x07b6), // Greek_iotaaccentdieresis
    (0x0391, 0x07c1), // Greek_ALPHA
    (0x0392, 0x07c2), // Greek_BETA
    (0x0393, 0x07c3), // Greek_GAMMA
    (0x0394, 0x07c4), // Greek_DELTA
    (0x0395, 0x07c5), // Greek_EPSILON
    (0x0396, 0x07c6), // Greek_ZETA
    (0x0397, 0x07c7), // Greek_ETA
    (0x0398, 0x07c8), // Greek_THETA
    (0x0399, 0x07c9), // Greek_IOTA
    (0x039a, 0x07ca), // Greek_KAPPA
    (0x039b, 0x07cb), // Greek_LAMDA
    (0x039c, 0x07cc), // Greek_MU
    (0x039d, 0x07cd), // Greek_NU
    (0x039e, 0x07ce), // Greek_XI
    (0x039f, 0x07cf), // Greek_OMICRON
    (0x03a0, 0x07d0), // Greek_PI
    (0x03a1, 0x07d1), // Greek_RHO
    (0x03a3, 0x07d2), // Greek_SIGMA
    (0x03a4, 0x07d4), // Greek_TAU
    (0x03a5, 0x07d5), // Greek_UPSILON
    (0x03a6, 0x07d6), // Greek_PHI
    (0x03a7, 0x07d7), // Greek_CHI
    (0x03a8, 0x07d8), // Greek_PSI
    (0x03a9, 0x07d9), // Greek_OMEGA
    (0x03aa, 0x07a5), // Greek_IOTAdieresis
    (0x03ab, 0x07a9), // Greek_UPSILONdieresis
    (0x03ac, 0x07b1), // Greek_alphaaccent
    (0x03ad, 0x07b2), // Greek_epsilonaccent
    (0x03ae, 0x07b3), // Greek_etaaccent
    (0x03af, 0x07b4), // Greek_iotaaccent
    (0x03b0, 0x07ba), // Greek_upsilonaccentdieresis
    (0x03b1, 0x07e1), // Greek_alpha
    (0x03b2, 0x07e2), // Greek_beta
    (0x03b3, 0x07e3), // Greek_gamma
    (0x03b4, 0x07e4), // Greek_delta
    (0x03b5, 0x07e5), // Greek_epsilon
    (0x03b6, 0x07e6), // Greek_zeta
    (0x03b7, 0x07e7), // Greek_eta
    (0x03b8, 0x07e8), // Greek_theta
    (0x03b9, 0x07e9), // Greek_iota
    (0x03ba, 0x07ea), // Greek_kappa
    (0x03bb, 0x07eb), // Greek_lamda
    (0x03bc, 0x07ec), // Greek_mu
    (0x03bd, 0x07ed), // Greek_nu
    (0x03be, 0x07ee), // Greek_xi
    (0x03bf, 0x07ef), // Greek_omicron
    (0x03c0, 0x07f0), // Greek_pi
    (0x03c1, 0x07f1), // Greek_rho
    (0x03c2, 0x07f3), // Greek_finalsmallsigma
    (0x03c3, 0x07f2), // Greek_sigma
    (0x03c4, 0x07f4), // Greek_tau
    (0x03c5, 0x07f5), // Greek_upsilon
    (0x03c6, 0x07f6), // Greek_phi
    (0x03c7, 0x07f7), // Greek_chi
    (0x03c8, 0x07f8), // Greek_psi
    (0x03c9, 0x07f9), // Greek_omega
    (0x03ca, 0x07b5), // Greek_iotadieresis
    (0x03cb, 0x07b9), // Greek_upsilondieresis
    (0x03cc, 0x07b7), // Greek_omicronaccent
    (0x03cd, 0x07b8), // Greek_upsilonaccent
    (0x03ce, 0x07bb), // Greek_omegaaccent
    (0x0401, 0x06b3), // Cyrillic_IO
    (0x0402, 0x06b1), // Serbian_DJE
    (0x0403, 0x06b2), // Macedonia_GJE
    (0x0404, 0x06b4), // Ukrainian_IE
    (0x0405, 0x06b5), // Macedonia_DSE
    (0x0406, 0x06b6), // Ukrainian_I
    (0x0407, 0x06b7), // Ukrainian_YI
    (0x0408, 0x06b8), // Cyrillic_JE
    (0x0409, 0x06b9), // Cyrillic_LJE
    (0x040a, 0x06ba), // Cyrillic_NJE
    (0x040b, 0x06bb), // Serbian_TSHE
    (0x040c, 0x06bc), // Macedonia_KJE
    (0x040e, 0x06be), // Byelorussian_SHORTU
    (0x040f, 0x06bf), // Cyrillic_DZHE
    (0x0410, 0x06e1), // Cyrillic_A
    (0x0411, 0x06e2), // Cyrillic_BE
    (0x0412, 0x06f7), // Cyrillic_VE
    (0x0413, 0x06e7), // Cyrillic_GHE
    (0x0414, 0x06e4), // Cyrillic_DE
    (0x0415, 0x06e5), // Cyrillic_IE
    (0x0416, 0x06f6), // Cyrillic_ZHE
    (0x0417, 0x06fa), // Cyrillic_ZE
    (0x0418, 0x06e9), // Cyrillic_I
    (0x0419, 0x06ea), // Cyrillic_SHORTI
    (0x041a, 0x06eb), // Cyrillic_KA
    (0x041b, 0x06ec), // Cyrillic_EL
    (0x041c, 0x06ed), // Cyrillic_EM
    (0x041d, 0x06ee), // Cyrillic_EN
    (0x041e, 0x06ef), // Cyrillic_O
    (0x041f, 0x06f0), // Cyrillic_PE
    (0x0420, 0x06f2), // Cyrillic_ER
    (0x0421, 0x06f3), // Cyrillic_ES
    (0x0422, 0x06f4), // Cyrillic_TE
    (0x0423, 0x06f5), // Cyrillic_U
    (0x0424, 0x06e6), // Cyrillic_EF
    (0x0425, 0x06e8), // Cyrillic_HA
    (0x0426, 0x06e3), // Cyrillic_TSE
    (0x0427, 0x06fe), // Cyrillic_CHE
    (0x0428, 0x06fb), // Cyrillic_SHA
    (0x0429, 0x06fd), // Cyrillic_SHCHA
    (0x042a, 0x06ff), // Cyrillic_HARDSIGN
    (0x042b, 0x06f9), // Cyrillic_YERU
    (0x042c, 0x06f8), // Cyrillic_SOFTSIGN
    (0x042d, 0x06fc), // Cyrillic_E
    (0x042e, 0x06e0), // Cyrillic_YU
    (0x042f, 0x06f1), // Cyrillic_YA
    (0x0430, 0x06c1), // Cyrillic_a
    (0x0431, 0x06c2), // Cyrillic_be
    (0x0432, 0x06d7), // Cyrillic_ve
    (0x0433, 0x06c7), // Cyrillic_ghe
    (0x0434, 0x06c4), // Cyrillic_de
    (0x0435, 0x06c5), // Cyrillic_ie
    (0x0436, 0x06d6), // Cyrillic_zhe
    (0x0437, 0x06da), // Cyrillic_ze
    (0x0438, 0x06c9), // Cyrillic_i
    (0x0439, 0x06ca), // Cyrillic_shorti
    (0x043a, 0x06cb), // Cyrillic_ka
    (0x043b, 0x06cc), // Cyrillic_el
    (0x043c, 0x06cd), // Cyrillic_em
    (0x043d, 0x06ce), // Cyrillic_en
    (0x043e, 0x06cf), // Cyrillic_o
    (0x043f, 0x06d0), // Cyrillic_pe
    (0x0440, 0x06d2), // Cyrillic_er
    (0x0441, 0x06d3), // Cyrillic_es
    (0x0442, 0x06d4), // Cyrillic_te
    (0x0443, 0x06d5), // Cyrillic_u
    (0x0444, 0x06c6), // Cyrillic_ef
    (0x0445, 0x06c8), // Cyrillic_ha
    (0x0446, 0x06c3), // Cyrillic_tse
    (0x0447, 0x06de), // Cyrillic_che
    (0x0448, 0x06db), // Cyrillic_sha
    (0x0449, 0x06dd), // Cyrillic_shcha
    (0x044a, 0x06df), // Cyrillic_hardsign
    (0x044b, 0x06d9), // Cyrillic_yeru
    (0x044c, 0x06d8), // Cyrillic_softsign
    (0x044d, 0x06dc), // Cyrillic_e
    (0x044e, 0x06c0), // Cyrillic_yu
    (0x044f, 0x06d1), // Cyrillic_ya
    (0x0451, 0x06a3), // Cyrillic_io
    (0x0452, 0x06a1), // Serbian_dje
    (0x0453, 0x06a2), // Macedonia_gje
    (0x0454, 0x06a4), // Ukrainian_ie
    (0x0455, 0x06a5), // Macedonia_dse
    (0x0456, 0x06a6), // Ukrainian_i
    (0x0457, 0x06a7), // Ukrainian_yi
    (0x0458, 0x06a8), // Cyrillic_je
    (0x0459, 0x06a9), // Cyrillic_lje
    (0x045a, 0x06aa), // Cyrillic_nje
    (0x045b, 0x06ab), // Serbian_tshe
    (0x045c, 0x06ac), // Macedonia_kje
    (0x045e, 0x06ae), // Byelorussian_shortu
    (0x045f, 0x06af), // Cyrillic_dzhe
    (0x0490, 0x06bd), // Ukrainian_GHE_WITH_UPTURN
    (0x0491, 0x06ad), // Ukrainian_ghe_with_upturn
    (0x2013, 0x0aaa), // endash
    (0x2014, 0x0aa9), // emdash
    (0x2015, 0x07af), // Greek_horizbar
    (0x2018, 0x0ad0), // leftsinglequotemark
    (0x2019, 0x0ad1), // rightsinglequotemark
    (0x201c, 0x0ad2), // leftdoublequotemark
    (0x201d, 0x0ad3), // rightdoublequotemark
    (0x2026, 0x0aae), // ellipsis
    (0x20ac, 0x20ac), // EuroSign
    (0x2116, 0x06b0), // numerosign
];

/// Resolve a character to a keysym
///
/// Returns `None` for characters that have no keysym representation
/// (unhandled control characters and the 0x7F-0x9F gap). The caller is
/// responsible for filtering the vertical-tab sentinel before calling.
pub fn keysym_for_char(ch: char) -> Option<Keysym> {
    keysym_for_codepoint(ch as u32)
}

/// Resolve a raw code point to a keysym
///
/// Same mapping as [`keysym_for_char`] but also rejects values above
/// the valid Unicode range, which cannot be expressed as `char`.
pub fn keysym_for_codepoint(cp: u32) -> Option<Keysym> {
    if cp < 0x100 {
        // Printable Latin-1: the keysym is the code point itself.
        if (0x20..=0x7e).contains(&cp) || cp >= 0xa0 {
            return Some(cp);
        }
        return match cp {
            0x08 => Some(XK_BACKSPACE),
            0x09 => Some(XK_TAB),
            0x0a => Some(XK_LINEFEED),
            0x0d => Some(XK_RETURN),
            0x1b => Some(XK_ESCAPE),
            0x7f => Some(XK_DELETE),
            _ => None,
        };
    }
    if cp > 0x10ffff {
        return None;
    }
    if let Ok(idx) = LEGACY_KEYSYMS.binary_search_by_key(&cp, |&(point, _)| point) {
        return Some(LEGACY_KEYSYMS[idx].1);
    }
    Some(UNICODE_KEYSYM_BASE | cp)
}

/// Best-effort keysym name for diagnostics
///
/// Covers the function keysyms this crate emits, printable Latin-1, and
/// the `U+XXXX` form for Unicode keysyms. Everything else is rendered
/// as hex, which is enough to look the symbol up in keysymdef.h.
pub fn keysym_name(sym: Keysym) -> String {
    match sym {
        XK_BACKSPACE => "BackSpace".to_string(),
        XK_TAB => "Tab".to_string(),
        XK_LINEFEED => "Linefeed".to_string(),
        XK_RETURN => "Return".to_string(),
        XK_ESCAPE => "Escape".to_string(),
        XK_DELETE => "Delete".to_string(),
        XK_SHIFT_L => "Shift_L".to_string(),
        XK_MODE_SWITCH => "Mode_switch".to_string(),
        XK_ISO_LEVEL3_SHIFT => "ISO_Level3_Shift".to_string(),
        s if s >= UNICODE_KEYSYM_BASE => format!("U+{:04X}", s & 0x00ff_ffff),
        s if (0x20..=0x7e).contains(&s) || (0xa0..=0xff).contains(&s) => {
            char::from_u32(s).map_or_else(|| format!("{s:#06x}"), String::from)
        }
        s => format!("{s:#06x}"),
    }
}

/// Human-readable transliteration of a character for error messages
///
/// Control and formatting characters are rendered as `U+XXXX` so error
/// text stays printable.
pub fn display_char(ch: char) -> String {
    if ch.is_control() || (ch.is_whitespace() && ch != ' ') {
        format!("U+{:04X}", ch as u32)
    } else {
        ch.to_string()
    }
}
