/// Derives string conversions via serialization to/from base64
///
/// The type must be encodable with [`ToBytes`](crate::ToBytes) and
/// [`FromBytes`](crate::FromBytes), which every serde type is.
#[macro_export]
macro_rules! derive_base64_conversions {
    ($t:ty) => {
        impl ::std::fmt::Display for $t {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                use $crate::ToBytes;
                write!(
                    f,
                    "{}",
                    $crate::__base64::encode_config(
                        &self.to_bytes()?,
                        $crate::__base64::URL_SAFE_NO_PAD
                    )
                )
            }
        }

        impl ::std::str::FromStr for $t {
            type Err = $crate::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                use $crate::FromBytes;
                let bytes =
                    $crate::__base64::decode_config(s, $crate::__base64::URL_SAFE_NO_PAD)
                        .map_err($crate::Error::from)?;
                let x = Self::from_bytes(&bytes)?;
                Ok(x)
            }
        }
    };
}
