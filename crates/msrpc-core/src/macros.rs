/// Declare the request and response records of one DCOM method.
///
/// The request gets an implicit leading `this: OrpcThis`, the response an
/// implicit leading `that: OrpcThat` and trailing `return_value: i32`
/// (the HRESULT). Fields are marshaled in declaration order. The response
/// implements [`Operation`](crate::dcerpc::Operation) with the name
/// `/<interface>/v0/<name>`. An optional `check path;` after the request
/// names a function run on every decoded request; its error fails the decode.
///
/// ```ignore
/// dcom_operation! {
///     interface: "IDispatch",
///     name: "GetTypeInfoCount",
///     op_num: 3,
///     request GetTypeInfoCountRequest {}
///     response GetTypeInfoCountResponse { info: u32 }
/// }
/// ```
#[macro_export]
macro_rules! dcom_operation {
    (
        interface: $interface:literal,
        name: $name:literal,
        op_num: $op_num:literal,
        $(#[$req_meta:meta])*
        request $req:ident { $( $(#[$req_field_meta:meta])* $req_field:ident : $req_ty:ty ),* $(,)? }
        $( check $check:path; )?
        $(#[$resp_meta:meta])*
        response $resp:ident { $( $(#[$resp_field_meta:meta])* $resp_field:ident : $resp_ty:ty ),* $(,)? }
    ) => {
        $(#[$req_meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $req {
            pub this: $crate::dcom::OrpcThis,
            $( $(#[$req_field_meta])* pub $req_field: $req_ty, )*
        }

        impl $req {
            pub const OP_NUM: u16 = $op_num;
        }

        impl $crate::ndr::Marshal for $req {
            fn marshal_ndr(
                &self,
                w: &mut $crate::ndr::NdrWriter,
            ) -> ::std::result::Result<(), $crate::error::NdrError> {
                $crate::ndr::Marshal::marshal_ndr(&self.this, w)?;
                $( $crate::ndr::Marshal::marshal_ndr(&self.$req_field, w)?; )*
                Ok(())
            }
        }

        impl $crate::ndr::Unmarshal for $req {
            fn unmarshal_ndr(
                r: &mut $crate::ndr::NdrReader<'_>,
            ) -> ::std::result::Result<Self, $crate::error::NdrError> {
                let req = Self {
                    this: $crate::ndr::Unmarshal::unmarshal_ndr(r)?,
                    $( $req_field: $crate::ndr::Unmarshal::unmarshal_ndr(r)?, )*
                };
                $( $check(&req)?; )?
                Ok(req)
            }
        }

        $(#[$resp_meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $resp {
            pub that: $crate::dcom::OrpcThat,
            $( $(#[$resp_field_meta])* pub $resp_field: $resp_ty, )*
            pub return_value: i32,
        }

        impl $resp {
            pub const OP_NUM: u16 = $op_num;
        }

        impl $crate::ndr::Marshal for $resp {
            fn marshal_ndr(
                &self,
                w: &mut $crate::ndr::NdrWriter,
            ) -> ::std::result::Result<(), $crate::error::NdrError> {
                $crate::ndr::Marshal::marshal_ndr(&self.that, w)?;
                $( $crate::ndr::Marshal::marshal_ndr(&self.$resp_field, w)?; )*
                w.write_i32(self.return_value);
                Ok(())
            }
        }

        impl $crate::ndr::Unmarshal for $resp {
            fn unmarshal_ndr(
                r: &mut $crate::ndr::NdrReader<'_>,
            ) -> ::std::result::Result<Self, $crate::error::NdrError> {
                Ok(Self {
                    that: $crate::ndr::Unmarshal::unmarshal_ndr(r)?,
                    $( $resp_field: $crate::ndr::Unmarshal::unmarshal_ndr(r)?, )*
                    return_value: r.read_i32()?,
                })
            }
        }

        impl $crate::dcerpc::Operation for $resp {
            fn op_num(&self) -> u16 {
                $op_num
            }

            fn op_name(&self) -> &'static str {
                concat!("/", $interface, "/v0/", $name)
            }

            fn marshal_response(
                &self,
                w: &mut $crate::ndr::NdrWriter,
            ) -> ::std::result::Result<(), $crate::error::NdrError> {
                $crate::ndr::Marshal::marshal_ndr(self, w)
            }
        }
    };
}
