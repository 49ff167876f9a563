// src/noyau/jetons.rs

use super::erreur::{ErreurCalc, Resultat};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),
    /// Littéral imaginaire : `3i`, `2.5j`, `i` seul (= 1i)
    Imag(f64),
    Pi,

    // Fonctions + Ans (tout ce qui n’est pas pi / opérateur / nombre)
    // NOTE: le parse (RPN->Expr) décidera si c’est une fonction ou une constante.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou **

    LPar,
    RPar,

    /// Séparateur polaire ∠ (menu Complexe)
    Angle,
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 1.5, .5, 2e3, 1.2E-4)
/// - suffixe imaginaire collé (ex: 3i, 2j) ; `i` / `j` seuls = unité imaginaire
/// - opérateurs + - * / ^ (et ** comme synonyme de ^)
/// - parenthèses ( )
/// - π ou pi
/// - identifiants alphabétiques (normalisés en minuscules) : un chiffre coupe
///   l’identifiant, donc "sin30" -> sin, 30
/// - √ (équivaut à ident("sqrt")), ∠ (séparateur polaire)
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    tokenize_avec(s, false)
}

/// Variante pour relire une forme canonique : "log10" et "deg2rad" y sont des
/// noms de fonctions (alors qu’en saisie brute, "log10" veut dire log(10)).
pub fn tokenize_canonique(s: &str) -> Resultat<Vec<Tok>> {
    tokenize_avec(s, true)
}

fn tokenize_avec(s: &str, canonique: bool) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs + parenthèses
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '/' | '÷' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '∠' => Some(Tok::Angle),
            'π' => Some(Tok::Pi),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // '*' ou '**'
        if c == '*' || c == '×' {
            if c == '*' && i + 1 < chars.len() && chars[i + 1] == '*' {
                out.push(Tok::Caret);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // Identifiants : lettres ASCII seulement
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphabetic() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect::<String>().to_lowercase();

            // "log10" / "deg2rad" : formes canoniques, le chiffre fait partie du nom
            let word = match suffixe_canonique(&word, &chars[i..]) {
                Some((nom, avance)) if canonique => {
                    i += avance;
                    nom
                }
                _ => word,
            };

            out.push(match word.as_str() {
                "pi" => Tok::Pi,
                "i" | "j" => Tok::Imag(1.0),
                _ => Tok::Ident(word),
            });
            continue;
        }

        // Nombre décimal
        if c.is_ascii_digit() || c == '.' {
            let (valeur, fin) = lire_nombre(&chars, i)?;
            i = fin;

            // suffixe imaginaire collé : 3i, 2j (mais pas "3in...")
            if i < chars.len()
                && (chars[i] == 'i' || chars[i] == 'j')
                && !chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic())
            {
                out.push(Tok::Imag(valeur));
                i += 1;
            } else {
                out.push(Tok::Num(valeur));
            }
            continue;
        }

        return Err(ErreurCalc::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Noms canoniques contenant un chiffre (produits par la normalisation).
fn suffixe_canonique(word: &str, reste: &[char]) -> Option<(String, usize)> {
    let commence_par = |motif: &str| {
        let m: Vec<char> = motif.chars().collect();
        reste.len() >= m.len() && reste[..m.len()] == m[..]
    };
    match word {
        "log" if commence_par("10") => Some(("log10".to_string(), 2)),
        "deg" if commence_par("2rad") => Some(("deg2rad".to_string(), 4)),
        _ => None,
    }
}

/// Lit un nombre à partir de `debut` : chiffres, point optionnel, exposant optionnel.
/// Retourne (valeur, indice de fin).
fn lire_nombre(chars: &[char], debut: usize) -> Resultat<(f64, usize)> {
    let mut i = debut;
    let mut vu_point = false;
    let mut vu_chiffre = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() {
            vu_chiffre = true;
        } else if c == '.' {
            if vu_point {
                return Err(ErreurCalc::syntaxe("nombre invalide (deux points)"));
            }
            vu_point = true;
        } else {
            break;
        }
        i += 1;
    }

    if !vu_chiffre {
        return Err(ErreurCalc::syntaxe("nombre invalide ('.' seul)"));
    }

    // exposant : e / E, signe optionnel, au moins un chiffre
    // (sinon le 'e' reste un identifiant et l’évaluation le refusera)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let texte: String = chars[debut..i].iter().collect();
    let valeur = texte
        .parse::<f64>()
        .map_err(|_| ErreurCalc::syntaxe(format!("nombre invalide: {texte}")))?;
    Ok((valeur, i))
}

/// Format utilitaire (forme canonique / “démarche”) : liste de jetons en texte.
/// La sortie est re-tokenisable : tokenize_canonique(format_tokens(t)) == t.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Imag(v) => format!("{v}i"),
            Tok::Pi => "π".to_string(),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Angle => "∠".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
