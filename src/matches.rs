//! Octet class predicates from the HTTP grammar.

macro_rules! byte_map {
    // ===== 256 lookup table =====
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident:$u8:ty) { $e:expr }
    } => {
        $(#[$meta])*
        $vis const fn $fn_id($byte: $u8) -> bool {
            static PAT: [bool; 256] = {
                let mut bytes = [false; 256];
                let mut $byte = 0u8;
                const fn filter($byte: $u8) -> bool {
                    $e
                }
                loop {
                    bytes[$byte as usize] = filter($byte);
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                bytes
            };
            // SAFETY: the pattern size is equal to u8::MAX
            unsafe { *PAT.as_ptr().add($byte as usize) }
        }
    };
}

byte_map! {
    /// CHAR = any US-ASCII octet (0..=127)
    #[inline(always)]
    pub const fn is_char(byte: u8) {
        byte <= 127
    }
}

byte_map! {
    /// CTL = octets 0..=31 and DEL (127)
    #[inline(always)]
    pub const fn is_control(byte: u8) {
        byte <= 31 || byte == 127
    }
}

byte_map! {
    /// DIGIT = "0".."9"
    #[inline(always)]
    pub const fn is_digit(byte: u8) {
        byte.is_ascii_digit()
    }
}

byte_map! {
    /// separators = "(" / ")" / "<" / ">" / "@" / "," / ";" / ":" / "\" / DQUOTE
    ///            / "/" / "[" / "]" / "?" / "=" / "{" / "}" / SP / HT
    #[inline(always)]
    pub const fn is_special(byte: u8) {
        matches!(
            byte,
            | b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"'
            | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}' | b' ' | b'\t'
        )
    }
}

byte_map! {
    /// token octet: CHAR that is neither CTL nor separator
    #[inline(always)]
    pub const fn is_token(byte: u8) {
        is_char(byte) && !is_control(byte) && !is_special(byte)
    }
}
